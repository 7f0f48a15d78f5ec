use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::config::ServerConfig;
use crate::export::TabFileExporter;
use crate::forms::orders::{CreateOrderForm, UpdateOrderForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::orders::{
    OrderQuery, clear_order_lines, create_order, delete_order, export_order, get_order,
    list_order_lines, list_order_statuses, list_orders, update_order,
};

#[get("/v1/orders")]
/// Paginated orders with optional project, status and search filters.
pub async fn api_v1_orders(
    params: web::Query<OrderQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(orders) => HttpResponse::Ok().json(orders),
        Err(err) => error_response(err, &config, "list orders"),
    }
}

#[post("/v1/orders")]
pub async fn api_v1_create_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    form: web::Json<CreateOrderForm>,
) -> impl Responder {
    match create_order(repo.get_ref(), &user, form.into_inner()) {
        Ok(order) => HttpResponse::Created().json(order),
        Err(err) => error_response(err, &config, "create order"),
    }
}

#[get("/v1/orders/{order_id}")]
pub async fn api_v1_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match get_order(repo.get_ref(), &user, path.into_inner()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, &config, "load order"),
    }
}

#[put("/v1/orders/{order_id}")]
/// Update an order; submitting a created order writes its export file.
pub async fn api_v1_update_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    exporter: web::Data<TabFileExporter>,
    config: web::Data<ServerConfig>,
    form: web::Json<UpdateOrderForm>,
) -> impl Responder {
    match update_order(
        repo.get_ref(),
        exporter.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, &config, "update order"),
    }
}

#[delete("/v1/orders/{order_id}")]
pub async fn api_v1_delete_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match delete_order(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, &config, "delete order"),
    }
}

#[get("/v1/orders/{order_id}/lines")]
pub async fn api_v1_order_lines(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_order_lines(repo.get_ref(), &user, path.into_inner()) {
        Ok(lines) => HttpResponse::Ok().json(lines),
        Err(err) => error_response(err, &config, "list order lines"),
    }
}

#[delete("/v1/orders/{order_id}/lines")]
pub async fn api_v1_clear_order_lines(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match clear_order_lines(repo.get_ref(), &user, path.into_inner()) {
        Ok(deleted) => HttpResponse::Ok().json(json!({ "deleted": deleted })),
        Err(err) => error_response(err, &config, "clear order lines"),
    }
}

#[post("/v1/orders/{order_id}/export")]
/// Rewrite the export file of an order, e.g. after a failed automatic export.
pub async fn api_v1_export_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    exporter: web::Data<TabFileExporter>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match export_order(repo.get_ref(), exporter.get_ref(), &user, path.into_inner()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, &config, "export order"),
    }
}

#[get("/v1/order-statuses")]
pub async fn api_v1_order_statuses(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_order_statuses(repo.get_ref(), &user) {
        Ok(statuses) => HttpResponse::Ok().json(statuses),
        Err(err) => error_response(err, &config, "list order statuses"),
    }
}
