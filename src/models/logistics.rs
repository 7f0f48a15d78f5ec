use diesel::prelude::*;

use crate::domain::logistics::{
    Address as DomainAddress, Carrier as DomainCarrier, CarrierService as DomainCarrierService,
    Contact as DomainContact,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contacts)]
pub struct Contact {
    pub id: i32,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::addresses)]
pub struct Address {
    pub id: i32,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::carriers)]
pub struct Carrier {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::carrier_services)]
pub struct CarrierService {
    pub id: i32,
    pub carrier_id: i32,
    pub service_name: String,
}

impl From<Contact> for DomainContact {
    fn from(value: Contact) -> Self {
        Self {
            id: value.id,
            company_name: value.company_name,
            phone: value.phone,
            email: value.email,
        }
    }
}

impl From<Address> for DomainAddress {
    fn from(value: Address) -> Self {
        Self {
            id: value.id,
            address_line_1: value.address_line_1,
            address_line_2: value.address_line_2,
            city: value.city,
            state: value.state,
            postal_code: value.postal_code,
            country: value.country,
        }
    }
}

impl From<Carrier> for DomainCarrier {
    fn from(value: Carrier) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<CarrierService> for DomainCarrierService {
    fn from(value: CarrierService) -> Self {
        Self {
            id: value.id,
            carrier_id: value.carrier_id,
            service_name: value.service_name,
        }
    }
}
