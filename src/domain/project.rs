use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Encoding used by downstream systems when consuming a project's orders.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON document per order.
    #[default]
    #[serde(rename = "JSON")]
    Json,
    /// Comma separated file per order.
    #[serde(rename = "CSV")]
    Csv,
}

impl From<&str> for ExportFormat {
    fn from(value: &str) -> Self {
        match value {
            "CSV" => Self::Csv,
            _ => Self::Json,
        }
    }
}

impl From<ExportFormat> for &'static str {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

/// Customer owning one or more projects.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Client {
    /// Unique identifier of the client.
    pub id: i32,
    /// Display name of the client.
    pub name: String,
    /// Short human-assigned code, written as the export `Owner`.
    pub lookup_code: String,
    /// Whether the client is still active.
    pub is_active: bool,
}

/// Project grouping orders, materials and the users allowed to manage them.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Project {
    /// Unique identifier of the project.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional client the project belongs to.
    pub client_id: Option<i32>,
    /// Display name of the project.
    pub name: String,
    /// Short human-assigned code used to scope reports.
    pub lookup_code: String,
    /// Leading segment of generated order codes.
    pub orders_prefix: String,
    /// Export encoding copied onto new orders.
    pub export_format: ExportFormat,
    /// Whether the project accepts new orders.
    pub is_active: bool,
    /// Free-form operator notes.
    pub notes: Option<String>,
    /// Timestamp for when the project record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the project record.
    pub updated_at: NaiveDateTime,
}

impl Project {
    /// Build the order code for the `number`-th order of this project.
    pub fn order_code(&self, number: i32) -> String {
        format_order_code(&self.orders_prefix, number)
    }
}

/// Format an order code as `{prefix}-{number}` with the number padded to six digits.
pub fn format_order_code(prefix: &str, number: i32) -> String {
    format!("{prefix}-{number:06}")
}

/// Payload required to insert a new project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub hub_id: i32,
    pub client_id: Option<i32>,
    pub name: String,
    pub lookup_code: String,
    pub orders_prefix: String,
    pub export_format: ExportFormat,
    pub notes: Option<String>,
}

impl NewProject {
    /// Build a project payload with the default export format.
    pub fn new(
        hub_id: i32,
        name: impl Into<String>,
        lookup_code: impl Into<String>,
        orders_prefix: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            client_id: None,
            name: name.into(),
            lookup_code: lookup_code.into(),
            orders_prefix: orders_prefix.into(),
            export_format: ExportFormat::default(),
            notes: None,
        }
    }

    /// Attach the owning client.
    pub fn with_client_id(mut self, client_id: i32) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Override the export format.
    pub fn with_export_format(mut self, export_format: ExportFormat) -> Self {
        self.export_format = export_format;
        self
    }
}
