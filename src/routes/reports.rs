use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::config::ServerConfig;
use crate::forms::reports::{AdHocQueryForm, InventoryQuery};
use crate::reporting::{ReportExecutor, SqlLoader};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::reports::{
    execute_ad_hoc, execute_report, get_report, inventory_report, list_reports,
};

#[get("/v1/reports")]
pub async fn api_v1_reports(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_reports(repo.get_ref(), &user) {
        Ok(reports) => HttpResponse::Ok().json(reports),
        Err(err) => error_response(err, &config, "list reports"),
    }
}

#[get("/v1/reports/inventory")]
/// Inventory of the user's project; `order_type=outbound` (default) hides empty stock.
pub async fn api_v1_inventory_report(
    params: web::Query<InventoryQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    loader: web::Data<SqlLoader>,
    executor: web::Data<ReportExecutor>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match inventory_report(
        repo.get_ref(),
        loader.get_ref(),
        executor.get_ref(),
        &user,
        params.into_inner(),
    )
    .await
    {
        Ok(output) => HttpResponse::Ok().json(output),
        Err(err) => error_response(err, &config, "run inventory report"),
    }
}

#[get("/v1/reports/{report_id:\\d+}")]
pub async fn api_v1_report(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match get_report(repo.get_ref(), &user, path.into_inner()) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(err) => error_response(err, &config, "load report"),
    }
}

#[get("/v1/reports/{report_id:\\d+}/execute")]
/// Run a stored report and return its columns and rows.
pub async fn api_v1_execute_report(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    loader: web::Data<SqlLoader>,
    executor: web::Data<ReportExecutor>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match execute_report(
        repo.get_ref(),
        loader.get_ref(),
        executor.get_ref(),
        &user,
        path.into_inner(),
    )
    .await
    {
        Ok(output) => HttpResponse::Ok().json(output),
        Err(err) => error_response(err, &config, "execute report"),
    }
}

#[post("/v1/reports/query")]
/// Query console: runs arbitrary SQL against the reporting database.
///
/// Requires both the service role and `crate::QUERY_CONSOLE_ROLE`.
pub async fn api_v1_ad_hoc_query(
    user: AuthenticatedUser,
    executor: web::Data<ReportExecutor>,
    config: web::Data<ServerConfig>,
    form: web::Json<AdHocQueryForm>,
) -> impl Responder {
    match execute_ad_hoc(executor.get_ref(), &user, form.into_inner()).await {
        Ok(output) => HttpResponse::Ok().json(output),
        Err(err) => error_response(err, &config, "execute ad-hoc query"),
    }
}
