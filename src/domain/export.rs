use serde::Serialize;

use crate::domain::logistics::{Address, Carrier, CarrierService, Contact};
use crate::domain::material::{Material, Uom};
use crate::domain::order::{Order, OrderLine};
use crate::domain::project::{Client, Project};

/// Order line joined with the material data the export needs.
#[derive(Debug, Clone, Serialize)]
pub struct ExportLine {
    pub line: OrderLine,
    pub material: Material,
    /// Unit of measure set on the line itself.
    pub uom: Option<Uom>,
}

impl ExportLine {
    /// Lookup code of the line unit, falling back to the material unit.
    pub fn uom_code(&self) -> &str {
        self.uom
            .as_ref()
            .or(self.material.uom.as_ref())
            .map(|uom| uom.lookup_code.as_str())
            .unwrap_or("")
    }
}

/// Everything written to the warehouse export file for one order.
///
/// Optional relations stay `None` when the order does not reference them.
#[derive(Debug, Clone, Serialize)]
pub struct OrderExport {
    pub order: Order,
    pub project: Project,
    pub client: Option<Client>,
    pub contact: Option<Contact>,
    pub shipping_address: Option<Address>,
    pub carrier: Option<Carrier>,
    pub service_type: Option<CarrierService>,
    pub lines: Vec<ExportLine>,
}
