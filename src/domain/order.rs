use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::domain::project::ExportFormat;

/// Identifier of the seeded "Created" order status.
pub const CREATED_STATUS_ID: i32 = 1;
/// Identifier of the seeded "Submitted" order status.
pub const SUBMITTED_STATUS_ID: i32 = 2;

/// Entry of the controlled order status vocabulary.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderStatus {
    pub id: i32,
    pub status_name: String,
    pub lookup_code: String,
    pub description: String,
}

/// Per-project sequence from which order codes are generated.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct OrderCounter {
    /// Project owning the sequence.
    pub project_id: i32,
    /// Last number handed out; zero before the first order.
    pub last_number: i32,
}

/// Status change observed by a single order update.
///
/// Only the immediately prior persisted status is known, so several updates
/// between two reads collapse to their endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusTransition {
    /// Status persisted before the update.
    pub previous: i32,
    /// Status persisted by the update.
    pub current: i32,
}

impl StatusTransition {
    pub fn new(previous: i32, current: i32) -> Self {
        Self { previous, current }
    }

    /// Whether this transition hands the order over to the warehouse.
    pub fn triggers_export(&self) -> bool {
        self.previous == CREATED_STATUS_ID && self.current == SUBMITTED_STATUS_ID
    }
}

/// Errors produced when parsing a textual quantity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity `{0}` is not a non-negative decimal number")]
    Invalid(String),
    #[error("quantity `{0}` has more than two decimal places")]
    TooPrecise(String),
    #[error("quantity `{0}` is too large")]
    Overflow(String),
}

/// Non-negative decimal quantity with two-place precision, stored in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Quantity(i64);

impl Quantity {
    /// Build a quantity from its value in hundredths (`1250` is `12.50`).
    pub fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    pub fn hundredths(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let invalid = || QuantityError::Invalid(trimmed.to_string());

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(QuantityError::TooPrecise(trimmed.to_string()));
        }

        let overflow = || QuantityError::Overflow(trimmed.to_string());
        let whole: i64 = whole.parse().map_err(|_| overflow())?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|value| value.checked_add(fraction))
            .map(Quantity)
            .ok_or_else(overflow)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Line of an order referencing a single material.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderLine {
    /// Unique identifier of the line.
    pub id: i32,
    /// Order the line belongs to.
    pub order_id: i32,
    /// Ordered material.
    pub material_id: i32,
    /// Unit of measure overriding the material default.
    pub uom_id: Option<i32>,
    /// Ordered quantity.
    pub quantity: Quantity,
    pub lot: Option<String>,
    pub vendor_lot: Option<String>,
    pub license_plate: Option<String>,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
}

/// Payload describing a line to insert alongside an order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub material_id: i32,
    pub uom_id: Option<i32>,
    pub quantity: Quantity,
    pub lot: Option<String>,
    pub vendor_lot: Option<String>,
    pub license_plate: Option<String>,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
}

impl NewOrderLine {
    pub fn new(material_id: i32, quantity: Quantity) -> Self {
        Self {
            material_id,
            uom_id: None,
            quantity,
            lot: None,
            vendor_lot: None,
            license_plate: None,
            serial_number: None,
            notes: None,
        }
    }

    /// Override the unit of measure of the material.
    pub fn with_uom_id(mut self, uom_id: i32) -> Self {
        self.uom_id = Some(uom_id);
        self
    }
}

/// Domain representation of a warehouse order.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    /// Unique identifier of the order.
    pub id: i32,
    /// Generated order code, immutable once assigned.
    pub order_code: String,
    /// Generated shipment code, immutable once assigned.
    pub shipment_code: String,
    /// Customer supplied reference.
    pub reference_number: Option<String>,
    pub order_type_id: i32,
    pub order_class_id: i32,
    pub order_status_id: i32,
    /// Project the order was placed for.
    pub project_id: i32,
    pub warehouse_id: i32,
    pub contact_id: Option<i32>,
    pub shipping_address_id: Option<i32>,
    pub billing_address_id: Option<i32>,
    pub carrier_id: Option<i32>,
    pub service_type_id: Option<i32>,
    pub expected_delivery_date: Option<NaiveDateTime>,
    pub delivery_date: Option<NaiveDateTime>,
    /// Downstream encoding of the order.
    pub export_format: ExportFormat,
    /// Whether the warehouse export file has been written.
    pub file_generated: bool,
    /// When the warehouse export file was last written.
    pub file_generated_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    /// Lines of the order in insertion order.
    pub lines: Vec<OrderLine>,
    /// Timestamp for when the order record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the order record.
    pub updated_at: NaiveDateTime,
}

impl Order {
    /// Record a successful export in memory; persisting it is up to the caller.
    pub fn mark_file_generated(&mut self, at: NaiveDateTime) {
        self.file_generated = true;
        self.file_generated_at = Some(at);
    }
}

/// Payload required to insert a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Pre-assigned order code; generated from the project counter when absent.
    pub order_code: Option<String>,
    /// Pre-assigned shipment code; generated from the project counter when absent.
    pub shipment_code: Option<String>,
    pub reference_number: Option<String>,
    pub order_type_id: i32,
    pub order_class_id: i32,
    pub order_status_id: i32,
    pub project_id: i32,
    pub warehouse_id: i32,
    pub contact_id: Option<i32>,
    pub shipping_address_id: Option<i32>,
    pub billing_address_id: Option<i32>,
    pub carrier_id: Option<i32>,
    pub service_type_id: Option<i32>,
    pub expected_delivery_date: Option<NaiveDateTime>,
    pub delivery_date: Option<NaiveDateTime>,
    pub export_format: ExportFormat,
    pub notes: Option<String>,
    pub lines: Vec<NewOrderLine>,
    /// Timestamp captured when the order payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewOrder {
    /// Build a new order payload in the "Created" status with the current timestamp.
    pub fn new(project_id: i32, order_type_id: i32, order_class_id: i32, warehouse_id: i32) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            order_code: None,
            shipment_code: None,
            reference_number: None,
            order_type_id,
            order_class_id,
            order_status_id: CREATED_STATUS_ID,
            project_id,
            warehouse_id,
            contact_id: None,
            shipping_address_id: None,
            billing_address_id: None,
            carrier_id: None,
            service_type_id: None,
            expected_delivery_date: None,
            delivery_date: None,
            export_format: ExportFormat::default(),
            notes: None,
            lines: Vec::new(),
            updated_at: now,
        }
    }

    pub fn with_reference_number(mut self, reference_number: impl Into<String>) -> Self {
        self.reference_number = Some(reference_number.into());
        self
    }

    pub fn with_contact_id(mut self, contact_id: i32) -> Self {
        self.contact_id = Some(contact_id);
        self
    }

    /// Use the same address for shipping and billing.
    pub fn with_address_id(mut self, address_id: i32) -> Self {
        self.shipping_address_id = Some(address_id);
        self.billing_address_id = Some(address_id);
        self
    }

    pub fn with_carrier(mut self, carrier_id: i32, service_type_id: Option<i32>) -> Self {
        self.carrier_id = Some(carrier_id);
        self.service_type_id = service_type_id;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_export_format(mut self, export_format: ExportFormat) -> Self {
        self.export_format = export_format;
        self
    }

    pub fn with_line(mut self, line: NewOrderLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Keep an externally assigned order code instead of generating one.
    pub fn with_order_code(mut self, order_code: impl Into<String>) -> Self {
        self.order_code = Some(order_code.into());
        self
    }

    /// Whether saving this order needs a number from the project counter.
    pub fn needs_generated_code(&self) -> bool {
        self.order_code.is_none() || self.shipment_code.is_none()
    }
}

/// Patch data applied when updating an existing order.
///
/// Order and shipment codes are absent: they never change after insertion.
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    pub reference_number: Option<Option<String>>,
    pub order_type_id: Option<i32>,
    pub order_class_id: Option<i32>,
    pub order_status_id: Option<i32>,
    pub warehouse_id: Option<i32>,
    pub contact_id: Option<Option<i32>>,
    pub shipping_address_id: Option<Option<i32>>,
    pub billing_address_id: Option<Option<i32>>,
    pub carrier_id: Option<Option<i32>>,
    pub service_type_id: Option<Option<i32>>,
    pub expected_delivery_date: Option<Option<NaiveDateTime>>,
    pub delivery_date: Option<Option<NaiveDateTime>>,
    pub notes: Option<Option<String>>,
    /// Replacement set of lines; `None` keeps the stored lines.
    pub lines: Option<Vec<NewOrderLine>>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateOrder {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            reference_number: None,
            order_type_id: None,
            order_class_id: None,
            order_status_id: None,
            warehouse_id: None,
            contact_id: None,
            shipping_address_id: None,
            billing_address_id: None,
            carrier_id: None,
            service_type_id: None,
            expected_delivery_date: None,
            delivery_date: None,
            notes: None,
            lines: None,
            updated_at: now,
        }
    }

    /// Move the order to another status.
    pub fn status(mut self, order_status_id: i32) -> Self {
        self.order_status_id = Some(order_status_id);
        self
    }

    /// Update the notes, using `None` to clear an existing value.
    pub fn notes(mut self, notes: Option<impl Into<String>>) -> Self {
        self.notes = Some(notes.map(|value| value.into()));
        self
    }

    /// Update the customer reference, using `None` to clear an existing value.
    pub fn reference_number(mut self, reference_number: Option<impl Into<String>>) -> Self {
        self.reference_number = Some(reference_number.map(|value| value.into()));
        self
    }

    /// Replace every line of the order.
    pub fn lines(mut self, lines: Vec<NewOrderLine>) -> Self {
        self.lines = Some(lines);
        self
    }
}

/// Result of persisting an [`UpdateOrder`].
#[derive(Debug, Clone)]
pub struct UpdatedOrder {
    /// Order as stored after the update.
    pub order: Order,
    /// Status before and after the update.
    pub transition: StatusTransition,
}

/// Query definition used to list orders visible to a user.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    /// Projects the caller may see; an empty list matches nothing.
    pub project_ids: Vec<i32>,
    /// Optional narrowing to a single project.
    pub project_id: Option<i32>,
    /// Optional status filter.
    pub status_id: Option<i32>,
    /// Optional search term matched against codes, reference and notes.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    /// Construct a query over every order of the given projects.
    pub fn new(project_ids: Vec<i32>) -> Self {
        Self {
            project_ids,
            project_id: None,
            status_id: None,
            search: None,
            pagination: None,
        }
    }

    pub fn project_id(mut self, project_id: i32) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn status_id(mut self, status_id: i32) -> Self {
        self.status_id = Some(status_id);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_created_to_submitted_triggers_export() {
        assert!(StatusTransition::new(CREATED_STATUS_ID, SUBMITTED_STATUS_ID).triggers_export());

        assert!(!StatusTransition::new(SUBMITTED_STATUS_ID, SUBMITTED_STATUS_ID).triggers_export());
        assert!(!StatusTransition::new(SUBMITTED_STATUS_ID, CREATED_STATUS_ID).triggers_export());
        assert!(!StatusTransition::new(CREATED_STATUS_ID, CREATED_STATUS_ID).triggers_export());
        assert!(!StatusTransition::new(CREATED_STATUS_ID, 3).triggers_export());
        assert!(!StatusTransition::new(3, SUBMITTED_STATUS_ID).triggers_export());
    }

    #[test]
    fn quantity_parses_up_to_two_decimals() {
        assert_eq!("12.50".parse::<Quantity>(), Ok(Quantity::from_hundredths(1250)));
        assert_eq!("12.5".parse::<Quantity>(), Ok(Quantity::from_hundredths(1250)));
        assert_eq!(" 3 ".parse::<Quantity>(), Ok(Quantity::from_hundredths(300)));
        assert_eq!("0.07".parse::<Quantity>(), Ok(Quantity::from_hundredths(7)));
        assert_eq!("4.".parse::<Quantity>(), Ok(Quantity::from_hundredths(400)));
    }

    #[test]
    fn quantity_rejects_malformed_input() {
        assert!(matches!("".parse::<Quantity>(), Err(QuantityError::Invalid(_))));
        assert!(matches!("-1".parse::<Quantity>(), Err(QuantityError::Invalid(_))));
        assert!(matches!(".5".parse::<Quantity>(), Err(QuantityError::Invalid(_))));
        assert!(matches!("1,5".parse::<Quantity>(), Err(QuantityError::Invalid(_))));
        assert!(matches!("1.555".parse::<Quantity>(), Err(QuantityError::TooPrecise(_))));
        assert!(matches!(
            "99999999999999999999".parse::<Quantity>(),
            Err(QuantityError::Overflow(_))
        ));
    }

    #[test]
    fn quantity_displays_with_two_decimals() {
        assert_eq!(Quantity::from_hundredths(1250).to_string(), "12.50");
        assert_eq!(Quantity::from_hundredths(7).to_string(), "0.07");
        assert_eq!(Quantity::from_hundredths(300).to_string(), "3.00");
    }

    #[test]
    fn quantity_serializes_as_decimal_string() {
        let value = serde_json::to_value(Quantity::from_hundredths(505)).expect("serialize");
        assert_eq!(value, serde_json::json!("5.05"));

        let parsed: Quantity = serde_json::from_value(serde_json::json!("1.1")).expect("parse");
        assert_eq!(parsed.hundredths(), 110);
    }

    #[test]
    fn new_order_needs_code_until_both_are_set() {
        let order = NewOrder::new(1, 1, 1, 1);
        assert!(order.needs_generated_code());

        let order = order.with_order_code("EXT-1");
        assert!(order.needs_generated_code());

        let mut order = order;
        order.shipment_code = Some("EXT-1".to_string());
        assert!(!order.needs_generated_code());
    }
}
