use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::domain::report::{ReportDefinition, ReportOutput, ReportProject};
use crate::forms::reports::{AdHocQueryForm, InventoryQuery};
use crate::reporting::{ReportExecutor, SqlLoader};
use crate::repository::{ProjectReader, ReportReader};
use crate::services::projects::first_project;
use crate::services::{ServiceError, ServiceResult};
use crate::{QUERY_CONSOLE_ROLE, SERVICE_ACCESS_ROLE};

/// Category and file of the template behind the inventory report.
const INVENTORY_CATEGORY: &str = "inventory";
const INVENTORY_FILE: &str = "by_project.sql";

pub fn list_reports<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<ReportDefinition>>
where
    R: ReportReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.list_reports().map_err(ServiceError::from)
}

pub fn get_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    report_id: i32,
) -> ServiceResult<ReportDefinition>
where
    R: ReportReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_report_by_id(report_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Run a stored report for the user.
///
/// Project-filtered reports bind the lookup code of the user's first project
/// as the only parameter; users without projects are rejected before any
/// connection to the reporting database is made.
pub async fn execute_report<R>(
    repo: &R,
    loader: &SqlLoader,
    executor: &ReportExecutor,
    user: &AuthenticatedUser,
    report_id: i32,
) -> ServiceResult<ReportOutput>
where
    R: ReportReader + ProjectReader + ?Sized,
{
    let report = get_report(repo, user, report_id)?;

    let project = if report.requires_project_filter {
        Some(first_project(repo, user)?.ok_or(ServiceError::Unauthorized)?)
    } else {
        None
    };
    let params: Vec<String> = project
        .iter()
        .map(|project| project.lookup_code.clone())
        .collect();

    let sql = loader.resolve(&report.source)?;

    let mut output = executor.execute(&sql, &params).await.map_err(|err| {
        log::error!("Failed to execute report {}: {err}", report.name);
        ServiceError::from(err)
    })?;
    output.project = project.as_ref().map(ReportProject::from);

    Ok(output)
}

/// Run caller-supplied SQL with no parameters and no project scoping.
///
/// Grants unrestricted access to the reporting database and is limited to
/// holders of [`QUERY_CONSOLE_ROLE`].
pub async fn execute_ad_hoc(
    executor: &ReportExecutor,
    user: &AuthenticatedUser,
    form: AdHocQueryForm,
) -> ServiceResult<ReportOutput> {
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) || !check_role(QUERY_CONSOLE_ROLE, &user.roles)
    {
        return Err(ServiceError::Unauthorized);
    }

    let query = form
        .into_query()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    log::warn!("Ad-hoc reporting query run by {}", user.email);

    executor.execute_ad_hoc(&query).await.map_err(|err| {
        log::error!("Ad-hoc reporting query failed: {err}");
        ServiceError::from(err)
    })
}

/// Inventory of the user's first project.
///
/// Outbound requests only list stock with available quantity.
pub async fn inventory_report<R>(
    repo: &R,
    loader: &SqlLoader,
    executor: &ReportExecutor,
    user: &AuthenticatedUser,
    query: InventoryQuery,
) -> ServiceResult<ReportOutput>
where
    R: ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let project = first_project(repo, user)?.ok_or(ServiceError::Unauthorized)?;
    let only_available = query.scope().only_available();

    let sql = loader.load(INVENTORY_CATEGORY, INVENTORY_FILE)?;
    let params = vec![
        project.lookup_code.clone(),
        if only_available { "1" } else { "0" }.to_string(),
    ];

    let mut output = executor.execute(&sql, &params).await.map_err(|err| {
        log::error!("Failed to execute inventory report: {err}");
        ServiceError::from(err)
    })?;
    output.project = Some(ReportProject::from(&project));

    Ok(output)
}
