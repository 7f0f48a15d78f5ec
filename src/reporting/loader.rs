use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::domain::report::ReportSource;
use crate::reporting::{ReportError, ReportResult};

/// Reads SQL templates stored as `{base_dir}/{category}/{file_path}`.
///
/// Templates are read from disk on every call.
#[derive(Debug, Clone)]
pub struct SqlLoader {
    base_dir: PathBuf,
}

impl SqlLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path of the template for `category` and `file_path`.
    pub fn template_path(&self, category: &str, file_path: &str) -> ReportResult<PathBuf> {
        for segment in [category, file_path] {
            let relative = Path::new(segment);
            let is_plain = relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
            if segment.is_empty() || !is_plain {
                return Err(ReportError::InvalidPath(segment.to_string()));
            }
        }

        Ok(self.base_dir.join(category).join(file_path))
    }

    /// Load the template text for `category` and `file_path`.
    pub fn load(&self, category: &str, file_path: &str) -> ReportResult<String> {
        let path = self.template_path(category, file_path)?;

        match fs::read_to_string(&path) {
            Ok(sql) => Ok(sql),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(ReportError::SqlFileNotFound(path))
            }
            Err(err) => Err(ReportError::Io(err)),
        }
    }

    /// Resolve the SQL text of a report, reading templates from disk.
    pub fn resolve(&self, source: &ReportSource) -> ReportResult<String> {
        match source {
            ReportSource::File {
                category,
                file_path,
            } => self.load(category, file_path),
            ReportSource::Inline { query } => Ok(query.clone()),
        }
    }
}
