use serde::{Deserialize, Serialize};

/// Unit of measure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Uom {
    pub id: i32,
    pub name: String,
    pub lookup_code: String,
}

/// Material stocked for a project.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Material {
    /// Unique identifier of the material.
    pub id: i32,
    /// Project the material belongs to.
    pub project_id: i32,
    /// Display name of the material.
    pub name: String,
    /// Optional short lookup code.
    pub lookup_code: Option<String>,
    /// Default unit of measure configured for the material.
    pub uom: Option<Uom>,
}

impl Material {
    /// Code written to exports: the lookup code when present, the name otherwise.
    pub fn export_code(&self) -> &str {
        match self.lookup_code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => &self.name,
        }
    }
}
