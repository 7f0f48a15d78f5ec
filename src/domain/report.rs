use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::project::Project;

/// Where the SQL text of a report comes from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ReportSource {
    /// Template stored on disk under `{base_dir}/{category}/{file_path}`.
    File { category: String, file_path: String },
    /// Query text stored with the definition.
    Inline { query: String },
}

/// Report available to API users.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportDefinition {
    /// Unique identifier of the report.
    pub id: i32,
    /// Display name of the report.
    pub name: String,
    /// Optional description shown next to the name.
    pub description: Option<String>,
    /// SQL text origin.
    #[serde(flatten)]
    pub source: ReportSource,
    /// Whether the caller's project lookup code is bound as the sole parameter.
    pub requires_project_filter: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new report definition.
#[derive(Debug, Clone)]
pub struct NewReportDefinition {
    pub name: String,
    pub description: Option<String>,
    pub source: ReportSource,
    pub requires_project_filter: bool,
}

impl NewReportDefinition {
    /// Report backed by a SQL template on disk, filtered by project.
    pub fn from_file(
        name: impl Into<String>,
        category: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            source: ReportSource::File {
                category: category.into(),
                file_path: file_path.into(),
            },
            requires_project_filter: true,
        }
    }

    /// Report backed by stored query text, filtered by project.
    pub fn inline(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            source: ReportSource::Inline {
                query: query.into(),
            },
            requires_project_filter: true,
        }
    }

    pub fn with_project_filter(mut self, requires_project_filter: bool) -> Self {
        self.requires_project_filter = requires_project_filter;
        self
    }
}

/// Project a report was scoped to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReportProject {
    pub id: i32,
    pub name: String,
    pub lookup_code: String,
}

impl From<&Project> for ReportProject {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            lookup_code: project.lookup_code.clone(),
        }
    }
}

/// Normalised query result ready for serialization.
#[derive(Debug, Serialize, Clone, Default)]
pub struct ReportOutput {
    /// Column names in the order produced by the query.
    pub columns: Vec<String>,
    /// One object per row, keyed by column name in column order.
    #[serde(rename = "results")]
    pub rows: Vec<Map<String, Value>>,
    /// Project whose lookup code scoped the query, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ReportProject>,
}
