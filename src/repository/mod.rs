use chrono::NaiveDateTime;
use pushkind_common::repository::errors::RepositoryResult;

use crate::db::{DbConnection, DbPool};
use crate::domain::export::OrderExport;
use crate::domain::order::{
    NewOrder, Order, OrderCounter, OrderListQuery, OrderStatus, UpdateOrder, UpdatedOrder,
};
use crate::domain::project::{NewProject, Project};
use crate::domain::report::{NewReportDefinition, ReportDefinition};

pub mod counter;
pub mod order;
pub mod project;
pub mod report;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only access to projects and their membership.
pub trait ProjectReader {
    /// Projects `user_email` belongs to within `hub_id`, ordered by ascending id.
    fn list_projects_for_user(&self, hub_id: i32, user_email: &str)
    -> RepositoryResult<Vec<Project>>;
    fn get_project_by_id(&self, project_id: i32) -> RepositoryResult<Option<Project>>;
}

/// Write operations over projects and their membership.
pub trait ProjectWriter {
    fn create_project(&self, new_project: &NewProject) -> RepositoryResult<Project>;
    fn add_project_member(&self, project_id: i32, user_email: &str) -> RepositoryResult<()>;
}

/// Per-project order numbering.
///
/// Implementations must hand out every number at most once per project, even
/// when several callers race for the same project.
pub trait OrderNumbering {
    /// Increment the project's counter, creating it at zero first if needed.
    fn get_next_number(&self, project_id: i32) -> RepositoryResult<i32>;
    /// Consume the next number and format it with the project prefix.
    fn generate_order_code(&self, project_id: i32) -> RepositoryResult<String>;
    fn get_order_counter(&self, project_id: i32) -> RepositoryResult<Option<OrderCounter>>;
}

/// Read-only operations over order records.
pub trait OrderReader {
    /// Fetch an order if it belongs to one of `project_ids`.
    fn get_order_by_id(&self, id: i32, project_ids: &[i32]) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    /// Load the order together with every relation written to its export file.
    fn get_order_export(&self, order_id: i32) -> RepositoryResult<Option<OrderExport>>;
    fn list_order_statuses(&self) -> RepositoryResult<Vec<OrderStatus>>;
    /// Whether any order already uses `code` as its order or shipment code.
    fn order_code_exists(&self, code: &str) -> RepositoryResult<bool>;
}

/// Write operations over order records.
pub trait OrderWriter {
    /// Insert the order and its lines, assigning missing codes in the same transaction.
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    /// Apply `updates` and report the status transition it caused.
    fn update_order(&self, order_id: i32, updates: &UpdateOrder)
    -> RepositoryResult<UpdatedOrder>;
    fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
    /// Remove every line of the order, returning how many were deleted.
    fn clear_order_lines(&self, order_id: i32) -> RepositoryResult<usize>;
    /// Persist the export flags set on the in-memory order.
    fn mark_file_generated(&self, order_id: i32, at: NaiveDateTime) -> RepositoryResult<()>;
}

/// Read-only operations over report definitions.
pub trait ReportReader {
    fn list_reports(&self) -> RepositoryResult<Vec<ReportDefinition>>;
    fn get_report_by_id(&self, id: i32) -> RepositoryResult<Option<ReportDefinition>>;
}

/// Write operations over report definitions.
pub trait ReportWriter {
    fn create_report(&self, new_report: &NewReportDefinition) -> RepositoryResult<ReportDefinition>;
}
