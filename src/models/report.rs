use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::report::{
    NewReportDefinition as DomainNewReportDefinition, ReportDefinition as DomainReportDefinition,
    ReportSource,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::report_definitions)]
pub struct ReportDefinition {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub file_path: Option<String>,
    pub query: Option<String>,
    pub requires_project_filter: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::report_definitions)]
pub struct NewReportDefinition<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub file_path: Option<&'a str>,
    pub query: Option<&'a str>,
    pub requires_project_filter: bool,
}

impl From<ReportDefinition> for DomainReportDefinition {
    fn from(value: ReportDefinition) -> Self {
        // The table CHECK constraint guarantees exactly one source is stored.
        let source = match value.query {
            Some(query) => ReportSource::Inline { query },
            None => ReportSource::File {
                category: value.category.unwrap_or_default(),
                file_path: value.file_path.unwrap_or_default(),
            },
        };

        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            source,
            requires_project_filter: value.requires_project_filter,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewReportDefinition> for NewReportDefinition<'a> {
    fn from(value: &'a DomainNewReportDefinition) -> Self {
        let (category, file_path, query) = match &value.source {
            ReportSource::File {
                category,
                file_path,
            } => (Some(category.as_str()), Some(file_path.as_str()), None),
            ReportSource::Inline { query } => (None, None, Some(query.as_str())),
        };

        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            category,
            file_path,
            query,
            requires_project_filter: value.requires_project_filter,
        }
    }
}
