use actix_web::{HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::orders::order_counter;
use crate::services::projects::{current_project, list_projects};

#[get("/v1/projects")]
/// Projects the user is a member of.
pub async fn api_v1_projects(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_projects(repo.get_ref(), &user) {
        Ok(projects) => HttpResponse::Ok().json(projects),
        Err(err) => error_response(err, &config, "list projects"),
    }
}

#[get("/v1/projects/current")]
/// The project reports are scoped to for this user.
pub async fn api_v1_current_project(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match current_project(repo.get_ref(), &user) {
        Ok(project) => HttpResponse::Ok().json(project),
        Err(err) => error_response(err, &config, "load current project"),
    }
}

#[get("/v1/projects/{project_id}/counter")]
pub async fn api_v1_project_counter(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match order_counter(repo.get_ref(), &user, path.into_inner()) {
        Ok(counter) => HttpResponse::Ok().json(counter),
        Err(err) => error_response(err, &config, "load order counter"),
    }
}
