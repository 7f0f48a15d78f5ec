use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::project::{
    Client as DomainClient, NewProject as DomainNewProject, Project as DomainProject,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub lookup_code: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::projects)]
pub struct Project {
    pub id: i32,
    pub hub_id: i32,
    pub client_id: Option<i32>,
    pub name: String,
    pub lookup_code: String,
    pub orders_prefix: String,
    pub export_format: String,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject<'a> {
    pub hub_id: i32,
    pub client_id: Option<i32>,
    pub name: &'a str,
    pub lookup_code: &'a str,
    pub orders_prefix: &'a str,
    pub export_format: &'a str,
    pub notes: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::project_members)]
pub struct NewProjectMember<'a> {
    pub project_id: i32,
    pub user_email: &'a str,
}

impl From<Client> for DomainClient {
    fn from(value: Client) -> Self {
        Self {
            id: value.id,
            name: value.name,
            lookup_code: value.lookup_code,
            is_active: value.is_active,
        }
    }
}

impl From<Project> for DomainProject {
    fn from(value: Project) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            client_id: value.client_id,
            name: value.name,
            lookup_code: value.lookup_code,
            orders_prefix: value.orders_prefix,
            export_format: value.export_format.as_str().into(),
            is_active: value.is_active,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProject> for NewProject<'a> {
    fn from(value: &'a DomainNewProject) -> Self {
        Self {
            hub_id: value.hub_id,
            client_id: value.client_id,
            name: value.name.as_str(),
            lookup_code: value.lookup_code.as_str(),
            orders_prefix: value.orders_prefix.as_str(),
            export_format: value.export_format.into(),
            notes: value.notes.as_deref(),
        }
    }
}
