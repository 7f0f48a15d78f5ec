//! Helpers for integration tests.
#![allow(dead_code)]

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use pushkind_logistics::db::{DbPool, establish_connection_pool};
use pushkind_logistics::domain::project::{NewProject, Project};
use pushkind_logistics::repository::{DieselRepository, ProjectWriter};
use pushkind_logistics::schema::{
    addresses, carrier_services, carriers, clients, contacts, materials, uoms, warehouses,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub const HUB_ID: i32 = 1;
pub const USER_EMAIL: &str = "operator@example.com";

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

/// Identifiers of the reference rows inserted by [`TestDb::seed_catalog`].
pub struct Catalog {
    pub warehouse_id: i32,
    pub client_id: i32,
    pub each_uom_id: i32,
    pub case_uom_id: i32,
    pub contact_id: i32,
    pub address_id: i32,
    pub carrier_id: i32,
    pub service_id: i32,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    /// Insert one row of every reference table an order can point at.
    pub fn seed_catalog(&self) -> Catalog {
        let mut conn = self.pool.get().expect("connection");

        let warehouse_id = diesel::insert_into(warehouses::table)
            .values((
                warehouses::name.eq("Main"),
                warehouses::lookup_code.eq("WH1"),
            ))
            .returning(warehouses::id)
            .get_result::<i32>(&mut conn)
            .expect("warehouse");

        let client_id = diesel::insert_into(clients::table)
            .values((clients::name.eq("Acme Corp"), clients::lookup_code.eq("ACME")))
            .returning(clients::id)
            .get_result::<i32>(&mut conn)
            .expect("client");

        let each_uom_id = diesel::insert_into(uoms::table)
            .values((uoms::name.eq("Each"), uoms::lookup_code.eq("EA")))
            .returning(uoms::id)
            .get_result::<i32>(&mut conn)
            .expect("uom");

        let case_uom_id = diesel::insert_into(uoms::table)
            .values((uoms::name.eq("Case"), uoms::lookup_code.eq("CS")))
            .returning(uoms::id)
            .get_result::<i32>(&mut conn)
            .expect("uom");

        let contact_id = diesel::insert_into(contacts::table)
            .values((
                contacts::company_name.eq(Some("Springfield Clinic")),
                contacts::phone.eq(Some("555-0100")),
            ))
            .returning(contacts::id)
            .get_result::<i32>(&mut conn)
            .expect("contact");

        let address_id = diesel::insert_into(addresses::table)
            .values((
                addresses::address_line_1.eq("1 Main St"),
                addresses::city.eq("Springfield"),
                addresses::state.eq("IL"),
                addresses::postal_code.eq("62701"),
                addresses::country.eq("USA"),
            ))
            .returning(addresses::id)
            .get_result::<i32>(&mut conn)
            .expect("address");

        let carrier_id = diesel::insert_into(carriers::table)
            .values(carriers::name.eq("UPS"))
            .returning(carriers::id)
            .get_result::<i32>(&mut conn)
            .expect("carrier");

        let service_id = diesel::insert_into(carrier_services::table)
            .values((
                carrier_services::carrier_id.eq(carrier_id),
                carrier_services::service_name.eq("Ground"),
            ))
            .returning(carrier_services::id)
            .get_result::<i32>(&mut conn)
            .expect("carrier service");

        Catalog {
            warehouse_id,
            client_id,
            each_uom_id,
            case_uom_id,
            contact_id,
            address_id,
            carrier_id,
            service_id,
        }
    }

    pub fn add_material(
        &self,
        project_id: i32,
        name: &str,
        lookup_code: Option<&str>,
        uom_id: Option<i32>,
    ) -> i32 {
        let mut conn = self.pool.get().expect("connection");

        diesel::insert_into(materials::table)
            .values((
                materials::project_id.eq(project_id),
                materials::name.eq(name),
                materials::lookup_code.eq(lookup_code),
                materials::uom_id.eq(uom_id),
            ))
            .returning(materials::id)
            .get_result::<i32>(&mut conn)
            .expect("material")
    }

    /// Create a project in [`HUB_ID`] with [`USER_EMAIL`] as member.
    pub fn add_project(&self, lookup_code: &str, prefix: &str, client_id: Option<i32>) -> Project {
        let repo = self.repo();

        let mut new_project = NewProject::new(HUB_ID, lookup_code, lookup_code, prefix);
        if let Some(client_id) = client_id {
            new_project = new_project.with_client_id(client_id);
        }

        let project = repo.create_project(&new_project).expect("project");
        repo.add_project_member(project.id, USER_EMAIL)
            .expect("membership");

        project
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
        std::fs::remove_file(format!("{}-journal", &self.filename)).ok();
    }
}
