use chrono::NaiveDateTime;
use mockall::mock;

use super::{
    OrderNumbering, OrderReader, OrderWriter, ProjectReader, ProjectWriter, ReportReader,
    ReportWriter,
};
use crate::domain::{
    export::OrderExport,
    order::{NewOrder, Order, OrderCounter, OrderListQuery, OrderStatus, UpdateOrder, UpdatedOrder},
    project::{NewProject, Project},
    report::{NewReportDefinition, ReportDefinition},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub Repository {}

    impl ProjectReader for Repository {
        fn list_projects_for_user(&self, hub_id: i32, user_email: &str) -> RepositoryResult<Vec<Project>>;
        fn get_project_by_id(&self, project_id: i32) -> RepositoryResult<Option<Project>>;
    }

    impl ProjectWriter for Repository {
        fn create_project(&self, new_project: &NewProject) -> RepositoryResult<Project>;
        fn add_project_member(&self, project_id: i32, user_email: &str) -> RepositoryResult<()>;
    }

    impl OrderNumbering for Repository {
        fn get_next_number(&self, project_id: i32) -> RepositoryResult<i32>;
        fn generate_order_code(&self, project_id: i32) -> RepositoryResult<String>;
        fn get_order_counter(&self, project_id: i32) -> RepositoryResult<Option<OrderCounter>>;
    }

    impl OrderReader for Repository {
        fn get_order_by_id(&self, id: i32, project_ids: &[i32]) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
        fn get_order_export(&self, order_id: i32) -> RepositoryResult<Option<OrderExport>>;
        fn list_order_statuses(&self) -> RepositoryResult<Vec<OrderStatus>>;
        fn order_code_exists(&self, code: &str) -> RepositoryResult<bool>;
    }

    impl OrderWriter for Repository {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn update_order(&self, order_id: i32, updates: &UpdateOrder) -> RepositoryResult<UpdatedOrder>;
        fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
        fn clear_order_lines(&self, order_id: i32) -> RepositoryResult<usize>;
        fn mark_file_generated(&self, order_id: i32, at: NaiveDateTime) -> RepositoryResult<()>;
    }

    impl ReportReader for Repository {
        fn list_reports(&self) -> RepositoryResult<Vec<ReportDefinition>>;
        fn get_report_by_id(&self, id: i32) -> RepositoryResult<Option<ReportDefinition>>;
    }

    impl ReportWriter for Repository {
        fn create_report(&self, new_report: &NewReportDefinition) -> RepositoryResult<ReportDefinition>;
    }
}
