//! Execution of report queries against the external reporting database.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub mod executor;
pub mod loader;

pub use executor::ReportExecutor;
pub use loader::SqlLoader;

/// Errors raised while loading or running a report query.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The SQL template referenced by a report does not exist.
    #[error("SQL file not found: {}", .0.display())]
    SqlFileNotFound(PathBuf),
    /// The template path escapes the configured base directory.
    #[error("invalid SQL file path: {0}")]
    InvalidPath(String),
    #[error("failed to read SQL file: {0}")]
    Io(#[from] io::Error),
    /// Connection or execution fault reported by the reporting database.
    #[error("reporting database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
