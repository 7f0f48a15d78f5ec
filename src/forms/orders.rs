use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::{NewOrder, NewOrderLine, Quantity, QuantityError, UpdateOrder};
use crate::domain::project::ExportFormat;
use crate::forms::sanitize_optional;

const CODE_MAX_LEN: u64 = 64;
const TEXT_MAX_LEN: u64 = 255;
const NOTES_MAX_LEN: u64 = 2048;
/// Digits in the numeric tail of a generated order code.
const GENERATED_NUMBER_DIGITS: usize = 6;

lazy_static! {
    /// Order codes name export files, so they are limited to file-name safe characters.
    static ref ORDER_CODE_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid order code regex");
}

/// Result type returned by the order form helpers.
pub type OrderFormResult<T> = Result<T, OrderFormError>;

/// Errors that can occur while processing order payloads.
#[derive(Debug, Error)]
pub enum OrderFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Quantity(#[from] QuantityError),
    /// A supplied order code has the `{prefix}-{number}` shape reserved for generated codes.
    #[error("order code `{0}` is reserved for generated codes")]
    ReservedCode(String),
}

/// Single order line submitted with an order.
#[derive(Debug, Deserialize, Validate)]
pub struct OrderLineForm {
    #[validate(range(min = 1))]
    pub material_id: i32,
    #[validate(range(min = 1))]
    pub uom_id: Option<i32>,
    /// Decimal quantity with up to two fractional digits.
    #[validate(length(min = 1, max = 32))]
    pub quantity: String,
    #[validate(length(max = TEXT_MAX_LEN))]
    pub lot: Option<String>,
    #[validate(length(max = TEXT_MAX_LEN))]
    pub vendor_lot: Option<String>,
    #[validate(length(max = TEXT_MAX_LEN))]
    pub license_plate: Option<String>,
    #[validate(length(max = TEXT_MAX_LEN))]
    pub serial_number: Option<String>,
    #[validate(length(max = NOTES_MAX_LEN))]
    pub notes: Option<String>,
}

impl OrderLineForm {
    pub fn into_new_line(self) -> OrderFormResult<NewOrderLine> {
        self.validate()?;

        let quantity: Quantity = self.quantity.parse()?;

        Ok(NewOrderLine {
            material_id: self.material_id,
            uom_id: self.uom_id,
            quantity,
            lot: sanitize_optional(self.lot.as_deref()),
            vendor_lot: sanitize_optional(self.vendor_lot.as_deref()),
            license_plate: sanitize_optional(self.license_plate.as_deref()),
            serial_number: sanitize_optional(self.serial_number.as_deref()),
            notes: sanitize_optional(self.notes.as_deref()),
        })
    }
}

fn into_lines(lines: Vec<OrderLineForm>) -> OrderFormResult<Vec<NewOrderLine>> {
    lines.into_iter().map(OrderLineForm::into_new_line).collect()
}

/// Whether `code` ends in `-` followed by at least six digits, like `ACME-000001`.
///
/// Presets of that shape could collide with a code the project counter hands out later.
fn is_generated_shape(code: &str) -> bool {
    code.rsplit_once('-').is_some_and(|(_, number)| {
        number.len() >= GENERATED_NUMBER_DIGITS && number.bytes().all(|byte| byte.is_ascii_digit())
    })
}

/// Payload used to create an order.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderForm {
    #[validate(range(min = 1))]
    pub project_id: i32,
    #[validate(range(min = 1))]
    pub order_type_id: i32,
    #[validate(range(min = 1))]
    pub order_class_id: i32,
    #[validate(range(min = 1))]
    pub warehouse_id: i32,
    /// Externally assigned order code; generated when omitted.
    #[validate(length(max = CODE_MAX_LEN), regex(path = *ORDER_CODE_RE))]
    pub order_code: Option<String>,
    #[validate(length(max = TEXT_MAX_LEN))]
    pub reference_number: Option<String>,
    pub contact_id: Option<i32>,
    pub shipping_address_id: Option<i32>,
    pub billing_address_id: Option<i32>,
    pub carrier_id: Option<i32>,
    pub service_type_id: Option<i32>,
    pub expected_delivery_date: Option<NaiveDateTime>,
    pub delivery_date: Option<NaiveDateTime>,
    #[validate(length(max = NOTES_MAX_LEN))]
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub lines: Vec<OrderLineForm>,
}

impl CreateOrderForm {
    /// Validates and sanitizes the payload into a domain `NewOrder`.
    ///
    /// `export_format` is copied from the owning project.
    pub fn into_new_order(self, export_format: ExportFormat) -> OrderFormResult<NewOrder> {
        self.validate()?;

        let order_code = match self.order_code {
            Some(code) if is_generated_shape(&code) => {
                return Err(OrderFormError::ReservedCode(code));
            }
            code => code,
        };

        let mut new_order = NewOrder::new(
            self.project_id,
            self.order_type_id,
            self.order_class_id,
            self.warehouse_id,
        )
        .with_export_format(export_format);

        new_order.order_code = order_code;
        new_order.reference_number = sanitize_optional(self.reference_number.as_deref());
        new_order.contact_id = self.contact_id;
        new_order.shipping_address_id = self.shipping_address_id;
        new_order.billing_address_id = self.billing_address_id;
        new_order.carrier_id = self.carrier_id;
        new_order.service_type_id = self.service_type_id;
        new_order.expected_delivery_date = self.expected_delivery_date;
        new_order.delivery_date = self.delivery_date;
        new_order.notes = sanitize_optional(self.notes.as_deref());
        new_order.lines = into_lines(self.lines)?;

        Ok(new_order)
    }
}

/// Payload used to update an order. Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateOrderForm {
    #[validate(range(min = 1))]
    pub order_status_id: Option<i32>,
    #[validate(range(min = 1))]
    pub order_type_id: Option<i32>,
    #[validate(range(min = 1))]
    pub order_class_id: Option<i32>,
    #[validate(range(min = 1))]
    pub warehouse_id: Option<i32>,
    /// Blank text clears the stored reference.
    #[validate(length(max = TEXT_MAX_LEN))]
    pub reference_number: Option<String>,
    pub contact_id: Option<i32>,
    pub shipping_address_id: Option<i32>,
    pub billing_address_id: Option<i32>,
    pub carrier_id: Option<i32>,
    pub service_type_id: Option<i32>,
    pub expected_delivery_date: Option<NaiveDateTime>,
    pub delivery_date: Option<NaiveDateTime>,
    /// Blank text clears the stored notes.
    #[validate(length(max = NOTES_MAX_LEN))]
    pub notes: Option<String>,
    /// Replacement lines; omitted to keep the stored lines.
    #[validate(nested)]
    pub lines: Option<Vec<OrderLineForm>>,
}

impl UpdateOrderForm {
    /// Validates and sanitizes the payload into a domain `UpdateOrder`.
    pub fn into_update_order(self, updated_at: NaiveDateTime) -> OrderFormResult<UpdateOrder> {
        self.validate()?;

        let lines = match self.lines {
            Some(lines) => Some(into_lines(lines)?),
            None => None,
        };

        Ok(UpdateOrder {
            reference_number: self
                .reference_number
                .map(|value| sanitize_optional(Some(&value))),
            order_type_id: self.order_type_id,
            order_class_id: self.order_class_id,
            order_status_id: self.order_status_id,
            warehouse_id: self.warehouse_id,
            contact_id: self.contact_id.map(Some),
            shipping_address_id: self.shipping_address_id.map(Some),
            billing_address_id: self.billing_address_id.map(Some),
            carrier_id: self.carrier_id.map(Some),
            service_type_id: self.service_type_id.map(Some),
            expected_delivery_date: self.expected_delivery_date.map(Some),
            delivery_date: self.delivery_date.map(Some),
            notes: self.notes.map(|value| sanitize_optional(Some(&value))),
            lines,
            updated_at,
        })
    }
}
