use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, NewOrderLine as DomainNewOrderLine, Order as DomainOrder,
    OrderCounter as DomainOrderCounter, OrderLine as DomainOrderLine,
    OrderStatus as DomainOrderStatus, Quantity,
    UpdateOrder as DomainUpdateOrder,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::order_statuses)]
pub struct OrderStatus {
    pub id: i32,
    pub status_name: String,
    pub lookup_code: String,
    pub description: String,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::order_counters)]
pub struct OrderCounter {
    pub id: i32,
    pub project_id: i32,
    pub last_number: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_counters)]
pub struct NewOrderCounter {
    pub project_id: i32,
    pub last_number: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub order_code: String,
    pub shipment_code: String,
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
    pub export_format: String,
    pub file_generated: bool,
    pub file_generated_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_lines)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderLine {
    pub id: i32,
    pub order_id: i32,
    pub material_id: i32,
    pub uom_id: Option<i32>,
    pub quantity_hundredths: i64,
    pub lot: Option<String>,
    pub vendor_lot: Option<String>,
    pub license_plate: Option<String>,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub order_code: &'a str,
    pub shipment_code: &'a str,
    pub reference_number: Option<&'a str>,
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
    pub export_format: &'a str,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_lines)]
pub struct NewOrderLine<'a> {
    pub order_id: i32,
    pub material_id: i32,
    pub uom_id: Option<i32>,
    pub quantity_hundredths: i64,
    pub lot: Option<&'a str>,
    pub vendor_lot: Option<&'a str>,
    pub license_plate: Option<&'a str>,
    pub serial_number: Option<&'a str>,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
pub struct UpdateOrder<'a> {
    pub reference_number: Option<Option<&'a str>>,
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
    pub notes: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

impl Order {
    pub fn into_domain(self, lines: Vec<OrderLine>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            order_code: self.order_code,
            shipment_code: self.shipment_code,
            reference_number: self.reference_number,
            order_type_id: self.order_type_id,
            order_class_id: self.order_class_id,
            order_status_id: self.order_status_id,
            project_id: self.project_id,
            warehouse_id: self.warehouse_id,
            contact_id: self.contact_id,
            shipping_address_id: self.shipping_address_id,
            billing_address_id: self.billing_address_id,
            carrier_id: self.carrier_id,
            service_type_id: self.service_type_id,
            expected_delivery_date: self.expected_delivery_date,
            delivery_date: self.delivery_date,
            export_format: self.export_format.as_str().into(),
            file_generated: self.file_generated,
            file_generated_at: self.file_generated_at,
            notes: self.notes,
            lines: lines.into_iter().map(DomainOrderLine::from).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<(Order, Vec<OrderLine>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderLine>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl From<OrderLine> for DomainOrderLine {
    fn from(value: OrderLine) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            material_id: value.material_id,
            uom_id: value.uom_id,
            quantity: Quantity::from_hundredths(value.quantity_hundredths),
            lot: value.lot,
            vendor_lot: value.vendor_lot,
            license_plate: value.license_plate,
            serial_number: value.serial_number,
            notes: value.notes,
        }
    }
}

impl From<OrderCounter> for DomainOrderCounter {
    fn from(value: OrderCounter) -> Self {
        Self {
            project_id: value.project_id,
            last_number: value.last_number,
        }
    }
}

impl From<OrderStatus> for DomainOrderStatus {
    fn from(value: OrderStatus) -> Self {
        Self {
            id: value.id,
            status_name: value.status_name,
            lookup_code: value.lookup_code,
            description: value.description,
        }
    }
}

impl<'a> NewOrder<'a> {
    /// Build the insert row once both codes are known.
    pub fn from_domain(
        value: &'a DomainNewOrder,
        order_code: &'a str,
        shipment_code: &'a str,
    ) -> Self {
        Self {
            order_code,
            shipment_code,
            reference_number: value.reference_number.as_deref(),
            order_type_id: value.order_type_id,
            order_class_id: value.order_class_id,
            order_status_id: value.order_status_id,
            project_id: value.project_id,
            warehouse_id: value.warehouse_id,
            contact_id: value.contact_id,
            shipping_address_id: value.shipping_address_id,
            billing_address_id: value.billing_address_id,
            carrier_id: value.carrier_id,
            service_type_id: value.service_type_id,
            expected_delivery_date: value.expected_delivery_date,
            delivery_date: value.delivery_date,
            export_format: value.export_format.into(),
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewOrderLine<'a> {
    pub fn from_domain(order_id: i32, value: &'a DomainNewOrderLine) -> Self {
        Self {
            order_id,
            material_id: value.material_id,
            uom_id: value.uom_id,
            quantity_hundredths: value.quantity.hundredths(),
            lot: value.lot.as_deref(),
            vendor_lot: value.vendor_lot.as_deref(),
            license_plate: value.license_plate.as_deref(),
            serial_number: value.serial_number.as_deref(),
            notes: value.notes.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateOrder> for UpdateOrder<'a> {
    fn from(value: &'a DomainUpdateOrder) -> Self {
        Self {
            reference_number: value
                .reference_number
                .as_ref()
                .map(|reference| reference.as_deref()),
            order_type_id: value.order_type_id,
            order_class_id: value.order_class_id,
            order_status_id: value.order_status_id,
            warehouse_id: value.warehouse_id,
            contact_id: value.contact_id,
            shipping_address_id: value.shipping_address_id,
            billing_address_id: value.billing_address_id,
            carrier_id: value.carrier_id,
            service_type_id: value.service_type_id,
            expected_delivery_date: value.expected_delivery_date,
            delivery_date: value.delivery_date,
            notes: value.notes.as_ref().map(|notes| notes.as_deref()),
            updated_at: value.updated_at,
        }
    }
}
