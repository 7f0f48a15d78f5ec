use pushkind_common::repository::errors::RepositoryError;
use thiserror::Error;

use crate::export::ExportError;
use crate::reporting::ReportError;

pub mod orders;
pub mod projects;
pub mod reports;

/// Errors surfaced by the service layer to route handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("resource not found")]
    NotFound,
    /// A report references a SQL template missing on disk.
    #[error("report SQL file not found: {0}")]
    SqlFileNotFound(String),
    #[error("unauthorized")]
    Unauthorized,
    /// Malformed or missing input.
    #[error("{0}")]
    Form(String),
    /// Connection or execution fault against the reporting database.
    #[error("reporting database failure: {0}")]
    ExternalStore(String),
    /// The export file could not be written.
    #[error("export failure: {0}")]
    Io(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<ReportError> for ServiceError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::SqlFileNotFound(path) => {
                ServiceError::SqlFileNotFound(path.display().to_string())
            }
            ReportError::Database(err) => ServiceError::ExternalStore(err.to_string()),
            ReportError::InvalidPath(path) => {
                ServiceError::Form(format!("report references an invalid SQL path: {path}"))
            }
            ReportError::Io(err) => ServiceError::Internal(err.to_string()),
        }
    }
}

impl From<ExportError> for ServiceError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::InvalidFileName(_) => ServiceError::Form(err.to_string()),
            other => ServiceError::Io(other.to_string()),
        }
    }
}
