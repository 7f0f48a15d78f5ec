use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::order::{Order, OrderCounter, OrderLine, OrderListQuery, OrderStatus, UpdatedOrder};
use crate::export::OrderExporter;
use crate::forms::orders::{CreateOrderForm, UpdateOrderForm};
use crate::repository::{OrderNumbering, OrderReader, OrderWriter, ProjectReader};
use crate::services::projects::{accessible_project_ids, accessible_projects};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the order list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    pub project_id: Option<i32>,
    pub status_id: Option<i32>,
    /// Matched against order code, shipment code, reference and notes.
    pub search: Option<String>,
    /// Page number requested by the client (1-based).
    pub page: Option<usize>,
}

/// Paginated orders of every project the user can access.
pub fn list_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrderQuery,
) -> ServiceResult<Paginated<Order>>
where
    R: OrderReader + ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let OrderQuery {
        project_id,
        status_id,
        search,
        page,
    } = query;
    let page = page.unwrap_or(1);

    let mut list_query = OrderListQuery::new(accessible_project_ids(repo, user)?);

    if let Some(project_id) = project_id {
        list_query = list_query.project_id(project_id);
    }

    if let Some(status_id) = status_id {
        list_query = list_query.status_id(status_id);
    }

    if let Some(term) = search.as_deref().map(str::trim).filter(|term| !term.is_empty()) {
        list_query = list_query.search(term);
    }

    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(Paginated::new(orders, page, total_pages))
}

/// Fetch a single order from one of the user's projects.
pub fn get_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<Order>
where
    R: OrderReader + ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    load_accessible_order(repo, user, order_id)
}

/// Create an order, generating its codes from the project counter when absent.
pub fn create_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateOrderForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let project = accessible_projects(repo, user)?
        .into_iter()
        .find(|project| project.id == form.project_id)
        .ok_or(ServiceError::Unauthorized)?;

    if !project.is_active {
        return Err(ServiceError::Form(format!(
            "project {} does not accept new orders",
            project.lookup_code
        )));
    }

    let new_order = form
        .into_new_order(project.export_format)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if let Some(code) = new_order.order_code.as_deref() {
        if repo.order_code_exists(code).map_err(ServiceError::from)? {
            return Err(ServiceError::Form(format!(
                "order code {code} is already in use"
            )));
        }
    }

    repo.create_order(&new_order).map_err(ServiceError::from)
}

/// Update an order and run the export when it moves from Created to Submitted.
///
/// The update is kept when the export fails; the failure is returned so the
/// operator can retry through [`export_order`].
pub fn update_order<R, E>(
    repo: &R,
    exporter: &E,
    user: &AuthenticatedUser,
    order_id: i32,
    form: UpdateOrderForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ProjectReader + ?Sized,
    E: OrderExporter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    load_accessible_order(repo, user, order_id)?;

    let updates = form
        .into_update_order(Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let UpdatedOrder { order, transition } = repo
        .update_order(order_id, &updates)
        .map_err(ServiceError::from)?;

    if !transition.triggers_export() {
        return Ok(order);
    }

    write_export(repo, exporter, order_id)
}

/// Write the export file of an order on explicit request.
pub fn export_order<R, E>(
    repo: &R,
    exporter: &E,
    user: &AuthenticatedUser,
    order_id: i32,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ProjectReader + ?Sized,
    E: OrderExporter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    load_accessible_order(repo, user, order_id)?;

    write_export(repo, exporter, order_id)
}

/// Delete an order together with its lines.
pub fn delete_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<()>
where
    R: OrderReader + OrderWriter + ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    load_accessible_order(repo, user, order_id)?;

    repo.delete_order(order_id).map_err(ServiceError::from)
}

pub fn list_order_lines<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
) -> ServiceResult<Vec<OrderLine>>
where
    R: OrderReader + ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(load_accessible_order(repo, user, order_id)?.lines)
}

/// Remove every line of an order, returning how many were deleted.
pub fn clear_order_lines<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
) -> ServiceResult<usize>
where
    R: OrderReader + OrderWriter + ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    load_accessible_order(repo, user, order_id)?;

    repo.clear_order_lines(order_id).map_err(ServiceError::from)
}

pub fn list_order_statuses<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<OrderStatus>>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.list_order_statuses().map_err(ServiceError::from)
}

/// Current counter of an accessible project; zero before its first order.
pub fn order_counter<R>(
    repo: &R,
    user: &AuthenticatedUser,
    project_id: i32,
) -> ServiceResult<OrderCounter>
where
    R: OrderNumbering + ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    if !accessible_project_ids(repo, user)?.contains(&project_id) {
        return Err(ServiceError::NotFound);
    }

    let counter = repo
        .get_order_counter(project_id)
        .map_err(ServiceError::from)?;

    Ok(counter.unwrap_or(OrderCounter {
        project_id,
        last_number: 0,
    }))
}

fn load_accessible_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<Order>
where
    R: OrderReader + ProjectReader + ?Sized,
{
    let project_ids = accessible_project_ids(repo, user)?;

    repo.get_order_by_id(order_id, &project_ids)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

fn write_export<R, E>(repo: &R, exporter: &E, order_id: i32) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
    E: OrderExporter + ?Sized,
{
    let mut export = repo
        .get_order_export(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if let Err(err) = exporter.generate_export_file(&mut export) {
        log::error!(
            "Failed to write export file for order {}: {err}",
            export.order.order_code
        );
        return Err(ServiceError::from(err));
    }

    let generated_at = export
        .order
        .file_generated_at
        .unwrap_or_else(|| Utc::now().naive_utc());

    repo.mark_file_generated(order_id, generated_at)
        .map_err(ServiceError::from)?;

    Ok(export.order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::domain::export::OrderExport;
    use crate::domain::order::{CREATED_STATUS_ID, Quantity, SUBMITTED_STATUS_ID, StatusTransition};
    use crate::domain::project::ExportFormat;
    use crate::export::ExportError;
    use crate::export::mock::MockExporter;
    use crate::forms::orders::OrderLineForm;
    use crate::repository::mock::MockRepository;
    use crate::services::projects::tests::{
        fixed_datetime, sample_project, user_with_roles,
    };

    fn sample_order(id: i32, status: i32) -> Order {
        Order {
            id,
            order_code: "ACME-000001".to_string(),
            shipment_code: "ACME-000001".to_string(),
            reference_number: None,
            order_type_id: 1,
            order_class_id: 1,
            order_status_id: status,
            project_id: 1,
            warehouse_id: 1,
            contact_id: None,
            shipping_address_id: None,
            billing_address_id: None,
            carrier_id: None,
            service_type_id: None,
            expected_delivery_date: None,
            delivery_date: None,
            export_format: ExportFormat::Json,
            file_generated: false,
            file_generated_at: None,
            notes: None,
            lines: Vec::new(),
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn sample_export(order: Order) -> OrderExport {
        OrderExport {
            order,
            project: sample_project(1, "P1"),
            client: None,
            contact: None,
            shipping_address: None,
            carrier: None,
            service_type: None,
            lines: Vec::new(),
        }
    }

    fn repo_with_project() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_list_projects_for_user()
            .returning(|_, _| Ok(vec![sample_project(1, "P1")]));
        repo
    }

    fn expect_accessible_order(repo: &mut MockRepository, status: i32) {
        repo.expect_get_order_by_id()
            .withf(|order_id, project_ids| *order_id == 10 && project_ids.to_vec() == vec![1])
            .returning(move |id, _| Ok(Some(sample_order(id, status))));
    }

    fn status_form(status: i32) -> UpdateOrderForm {
        UpdateOrderForm {
            order_status_id: Some(status),
            ..Default::default()
        }
    }

    fn expect_update(repo: &mut MockRepository, previous: i32, current: i32) {
        repo.expect_update_order()
            .times(1)
            .returning(move |id, _| {
                Ok(UpdatedOrder {
                    order: sample_order(id, current),
                    transition: StatusTransition::new(previous, current),
                })
            });
    }

    #[test]
    fn create_order_requires_role() {
        let repo = MockRepository::new();
        let user = user_with_roles(&[]);
        let form = CreateOrderForm {
            project_id: 1,
            order_type_id: 1,
            order_class_id: 1,
            warehouse_id: 1,
            order_code: None,
            reference_number: None,
            contact_id: None,
            shipping_address_id: None,
            billing_address_id: None,
            carrier_id: None,
            service_type_id: None,
            expected_delivery_date: None,
            delivery_date: None,
            notes: None,
            lines: Vec::new(),
        };

        let result = create_order(&repo, &user, form);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn create_order_copies_project_export_format() {
        let mut repo = repo_with_project();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.expect_create_order()
            .times(1)
            .withf(|new_order| {
                assert_eq!(new_order.project_id, 1);
                assert_eq!(new_order.export_format, ExportFormat::Csv);
                assert_eq!(new_order.order_status_id, CREATED_STATUS_ID);
                assert!(new_order.needs_generated_code());
                assert_eq!(new_order.lines.len(), 1);
                assert_eq!(new_order.lines[0].quantity, Quantity::from_hundredths(300));
                true
            })
            .returning(|_| Ok(sample_order(10, CREATED_STATUS_ID)));

        let form = CreateOrderForm {
            project_id: 1,
            order_type_id: 1,
            order_class_id: 1,
            warehouse_id: 1,
            order_code: None,
            reference_number: None,
            contact_id: None,
            shipping_address_id: None,
            billing_address_id: None,
            carrier_id: None,
            service_type_id: None,
            expected_delivery_date: None,
            delivery_date: None,
            notes: None,
            lines: vec![OrderLineForm {
                material_id: 5,
                uom_id: None,
                quantity: "3".to_string(),
                lot: None,
                vendor_lot: None,
                license_plate: None,
                serial_number: None,
                notes: None,
            }],
        };

        let order = create_order(&repo, &user, form).expect("expected success");

        assert_eq!(order.order_code, "ACME-000001");
    }

    #[test]
    fn create_order_rejects_foreign_project() {
        let repo = repo_with_project();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);
        let form = CreateOrderForm {
            project_id: 99,
            order_type_id: 1,
            order_class_id: 1,
            warehouse_id: 1,
            order_code: None,
            reference_number: None,
            contact_id: None,
            shipping_address_id: None,
            billing_address_id: None,
            carrier_id: None,
            service_type_id: None,
            expected_delivery_date: None,
            delivery_date: None,
            notes: None,
            lines: Vec::new(),
        };

        let result = create_order(&repo, &user, form);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn create_order_rejects_code_already_in_use() {
        let mut repo = repo_with_project();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.expect_order_code_exists()
            .times(1)
            .withf(|code| code.to_string() == "EXT-42")
            .returning(|_| Ok(true));
        repo.expect_create_order().never();

        let form = CreateOrderForm {
            project_id: 1,
            order_type_id: 1,
            order_class_id: 1,
            warehouse_id: 1,
            order_code: Some("EXT-42".to_string()),
            reference_number: None,
            contact_id: None,
            shipping_address_id: None,
            billing_address_id: None,
            carrier_id: None,
            service_type_id: None,
            expected_delivery_date: None,
            delivery_date: None,
            notes: None,
            lines: Vec::new(),
        };

        let result = create_order(&repo, &user, form);

        assert!(matches!(result, Err(ServiceError::Form(message)) if message.contains("EXT-42")));
    }

    #[test]
    fn submitting_created_order_writes_export_once() {
        let mut repo = repo_with_project();
        let mut exporter = MockExporter::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        expect_accessible_order(&mut repo, CREATED_STATUS_ID);
        expect_update(&mut repo, CREATED_STATUS_ID, SUBMITTED_STATUS_ID);
        repo.expect_get_order_export()
            .times(1)
            .returning(|id| Ok(Some(sample_export(sample_order(id, SUBMITTED_STATUS_ID)))));
        exporter
            .expect_generate_export_file()
            .times(1)
            .returning(|export| {
                export.order.mark_file_generated(fixed_datetime());
                Ok(PathBuf::from("order_ACME-000001.tab"))
            });
        repo.expect_mark_file_generated()
            .times(1)
            .withf(|order_id, at| *order_id == 10 && *at == fixed_datetime())
            .returning(|_, _| Ok(()));

        let order = update_order(&repo, &exporter, &user, 10, status_form(SUBMITTED_STATUS_ID))
            .expect("expected success");

        assert!(order.file_generated);
        assert_eq!(order.order_status_id, SUBMITTED_STATUS_ID);
    }

    #[test]
    fn other_transitions_do_not_export() {
        for (previous, current) in [
            (SUBMITTED_STATUS_ID, SUBMITTED_STATUS_ID),
            (SUBMITTED_STATUS_ID, CREATED_STATUS_ID),
            (CREATED_STATUS_ID, CREATED_STATUS_ID),
            (CREATED_STATUS_ID, 3),
        ] {
            let mut repo = repo_with_project();
            let exporter = MockExporter::new();
            let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

            expect_accessible_order(&mut repo, previous);
            expect_update(&mut repo, previous, current);
            repo.expect_get_order_export().times(0);
            repo.expect_mark_file_generated().times(0);

            let order = update_order(&repo, &exporter, &user, 10, status_form(current))
                .expect("expected success");

            assert_eq!(order.order_status_id, current);
            assert!(!order.file_generated);
        }
    }

    #[test]
    fn failed_export_keeps_status_and_reports_io_error() {
        let mut repo = repo_with_project();
        let mut exporter = MockExporter::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        expect_accessible_order(&mut repo, CREATED_STATUS_ID);
        expect_update(&mut repo, CREATED_STATUS_ID, SUBMITTED_STATUS_ID);
        repo.expect_get_order_export()
            .returning(|id| Ok(Some(sample_export(sample_order(id, SUBMITTED_STATUS_ID)))));
        exporter
            .expect_generate_export_file()
            .times(1)
            .returning(|_| {
                Err(ExportError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "share unavailable",
                )))
            });
        repo.expect_mark_file_generated().times(0);

        let result = update_order(&repo, &exporter, &user, 10, status_form(SUBMITTED_STATUS_ID));

        assert!(matches!(result, Err(ServiceError::Io(_))));
    }

    #[test]
    fn update_of_inaccessible_order_is_not_found() {
        let mut repo = repo_with_project();
        let exporter = MockExporter::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.expect_get_order_by_id().returning(|_, _| Ok(None));
        repo.expect_update_order().times(0);

        let result = update_order(&repo, &exporter, &user, 10, status_form(SUBMITTED_STATUS_ID));

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn manual_export_regenerates_file() {
        let mut repo = repo_with_project();
        let mut exporter = MockExporter::new();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        expect_accessible_order(&mut repo, SUBMITTED_STATUS_ID);
        repo.expect_get_order_export()
            .times(1)
            .returning(|id| Ok(Some(sample_export(sample_order(id, SUBMITTED_STATUS_ID)))));
        exporter
            .expect_generate_export_file()
            .times(1)
            .returning(|export| {
                export.order.mark_file_generated(fixed_datetime());
                Ok(PathBuf::from("order_ACME-000001.tab"))
            });
        repo.expect_mark_file_generated()
            .times(1)
            .returning(|_, _| Ok(()));

        let order = export_order(&repo, &exporter, &user, 10).expect("expected success");

        assert!(order.file_generated);
    }

    #[test]
    fn list_orders_limits_to_accessible_projects() {
        let mut repo = repo_with_project();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.expect_list_orders()
            .times(1)
            .withf(|query| {
                assert_eq!(query.project_ids, vec![1]);
                assert_eq!(query.status_id, Some(SUBMITTED_STATUS_ID));
                assert_eq!(query.search.as_deref(), Some("ACME"));
                true
            })
            .returning(|_| Ok((1, vec![sample_order(10, SUBMITTED_STATUS_ID)])));

        let query = OrderQuery {
            project_id: None,
            status_id: Some(SUBMITTED_STATUS_ID),
            search: Some("  ACME ".to_string()),
            page: None,
        };

        let orders = list_orders(&repo, &user, query).expect("expected success");
        let serialized = serde_json::to_value(&orders).expect("serialization should succeed");

        let items = serialized
            .get("items")
            .and_then(serde_json::Value::as_array)
            .expect("expected items array");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn clear_lines_returns_deleted_count() {
        let mut repo = repo_with_project();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        expect_accessible_order(&mut repo, CREATED_STATUS_ID);
        repo.expect_clear_order_lines()
            .times(1)
            .returning(|_| Ok(3));

        let deleted = clear_order_lines(&repo, &user, 10).expect("expected success");

        assert_eq!(deleted, 3);
    }

    #[test]
    fn counter_defaults_to_zero() {
        let mut repo = repo_with_project();
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        repo.expect_get_order_counter().returning(|_| Ok(None));

        let counter = order_counter(&repo, &user, 1).expect("expected success");

        assert_eq!(counter.last_number, 0);
        assert!(matches!(
            order_counter(&repo, &user, 2),
            Err(ServiceError::NotFound)
        ));
    }
}
