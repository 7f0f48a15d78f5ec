use serde::{Deserialize, Serialize};

/// Consignee contact of an order.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Contact {
    pub id: i32,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Postal address used for shipping or billing.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Address {
    pub id: i32,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Carrier {
    pub id: i32,
    pub name: String,
}

/// Service level offered by a carrier.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CarrierService {
    pub id: i32,
    pub carrier_id: i32,
    pub service_name: String,
}
