//! Tab-delimited order files picked up by the warehouse import job.

use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::domain::export::{ExportLine, OrderExport};

/// Header row of every export file, in output order.
pub const EXPORT_COLUMNS: [&str; 37] = [
    "OrderDate",
    "Owner",
    "Project",
    "OrderNumber",
    "Status",
    "ReferenceNumber",
    "Notes",
    "Material",
    "Lot",
    "Quantity",
    "UOM",
    "AccountID",
    "AccountName",
    "ContactLookup",
    "Title",
    "FirstName",
    "MiddleName",
    "LastName",
    "Addr1",
    "Addr2",
    "City",
    "State",
    "Zip",
    "Territory",
    "CountryName",
    "Phone",
    "Carrier",
    "ServiceType",
    "StateLic",
    "StateofLicensure",
    "StateLicExp",
    "DEANumber",
    "DEAExp",
    "ME",
    "Email",
    "Fax",
    "OrderFullfillmentDate",
];

/// Trailing compliance columns that are always written empty.
const RESERVED_COLUMNS: usize = 9;

/// Errors raised while writing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode export file: {0}")]
    Csv(#[from] csv::Error),
    /// The order code cannot be used as a file name inside the export directory.
    #[error("order code `{0}` is not a valid export file name")]
    InvalidFileName(String),
}

/// Writes the export file of an order.
///
/// On success the in-memory order is flagged as generated; persisting that
/// flag is left to the caller.
pub trait OrderExporter {
    fn generate_export_file(&self, export: &mut OrderExport) -> Result<PathBuf, ExportError>;
}

/// Exporter writing `order_{order_code}.tab` files into a directory.
#[derive(Debug, Clone)]
pub struct TabFileExporter {
    export_dir: PathBuf,
}

impl TabFileExporter {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// Destination of the export file for `order_code`.
    ///
    /// The file name must stay a single plain component of the export directory.
    pub fn file_path(&self, order_code: &str) -> Result<PathBuf, ExportError> {
        let file_name = format!("order_{order_code}.tab");

        let mut components = Path::new(&file_name).components();
        let is_plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !is_plain || file_name.contains(['/', '\\']) {
            return Err(ExportError::InvalidFileName(order_code.to_string()));
        }

        Ok(self.export_dir.join(file_name))
    }
}

impl OrderExporter for TabFileExporter {
    fn generate_export_file(&self, export: &mut OrderExport) -> Result<PathBuf, ExportError> {
        let path = self.file_path(&export.order.order_code)?;

        // Existing files for the same order are overwritten.
        let file = File::create(&path)?;
        write_records(file, export)?;

        export.order.mark_file_generated(Utc::now().naive_utc());
        log::info!(
            "Wrote export file {} for order {}",
            path.display(),
            export.order.order_code
        );

        Ok(path)
    }
}

/// Write the header and one record per order line into `writer`.
///
/// An order without lines still yields a single record with the line columns empty.
pub fn write_records<W: io::Write>(writer: W, export: &OrderExport) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(EXPORT_COLUMNS)?;

    if export.lines.is_empty() {
        writer.write_record(build_record(export, None))?;
    } else {
        for line in &export.lines {
            writer.write_record(build_record(export, Some(line)))?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn build_record(export: &OrderExport, line: Option<&ExportLine>) -> Vec<String> {
    let order = &export.order;
    let contact = export.contact.as_ref();
    let address = export.shipping_address.as_ref();

    let contact_id = contact.map(|c| c.id.to_string()).unwrap_or_default();
    let company_name = contact
        .and_then(|c| c.company_name.clone())
        .unwrap_or_default();

    let (material, quantity, uom) = match line {
        Some(line) => (
            line.material.export_code().to_string(),
            line.line.quantity.to_string(),
            line.uom_code().to_string(),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    let mut record = vec![
        order.updated_at.format("%m/%d/%Y").to_string(),
        export
            .client
            .as_ref()
            .map(|client| client.lookup_code.clone())
            .unwrap_or_default(),
        export.project.lookup_code.clone(),
        order.order_code.clone(),
        String::new(),
        order.reference_number.clone().unwrap_or_default(),
        order.notes.clone().unwrap_or_default(),
        material,
        String::new(),
        quantity,
        uom,
        contact_id.clone(),
        company_name.clone(),
        contact_id,
        String::new(),
        company_name,
        String::new(),
        String::new(),
        address.map(|a| a.address_line_1.clone()).unwrap_or_default(),
        address
            .and_then(|a| a.address_line_2.clone())
            .unwrap_or_default(),
        address.map(|a| a.city.clone()).unwrap_or_default(),
        address.map(|a| a.state.clone()).unwrap_or_default(),
        address.map(|a| a.postal_code.clone()).unwrap_or_default(),
        String::new(),
        address.map(|a| a.country.clone()).unwrap_or_default(),
        contact.and_then(|c| c.phone.clone()).unwrap_or_default(),
        export
            .carrier
            .as_ref()
            .map(|carrier| carrier.name.clone())
            .unwrap_or_default(),
        export
            .service_type
            .as_ref()
            .map(|service| service.service_name.clone())
            .unwrap_or_default(),
    ];
    record.extend(std::iter::repeat_n(String::new(), RESERVED_COLUMNS));

    record
}
