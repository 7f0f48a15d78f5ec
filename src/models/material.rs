use diesel::prelude::*;

use crate::domain::material::{Material as DomainMaterial, Uom as DomainUom};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::uoms)]
pub struct Uom {
    pub id: i32,
    pub name: String,
    pub lookup_code: String,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::materials)]
pub struct Material {
    pub id: i32,
    pub project_id: i32,
    pub name: String,
    pub lookup_code: Option<String>,
    pub uom_id: Option<i32>,
}

impl From<Uom> for DomainUom {
    fn from(value: Uom) -> Self {
        Self {
            id: value.id,
            name: value.name,
            lookup_code: value.lookup_code,
        }
    }
}

impl Material {
    pub fn into_domain(self, uom: Option<Uom>) -> DomainMaterial {
        DomainMaterial {
            id: self.id,
            project_id: self.project_id,
            name: self.name,
            lookup_code: self.lookup_code,
            uom: uom.map(DomainUom::from),
        }
    }
}
