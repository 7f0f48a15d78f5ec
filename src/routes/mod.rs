use actix_web::HttpResponse;
use serde_json::json;

use crate::config::ServerConfig;
use crate::services::ServiceError;

pub mod orders;
pub mod projects;
pub mod reports;

/// Translate a service failure into a JSON error response.
///
/// Reporting database diagnostics are only included when
/// `expose_error_details` is enabled.
pub fn error_response(err: ServiceError, config: &ServerConfig, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Forbidden().json(json!({ "error": "Insufficient permissions" }))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "Not found" })),
        ServiceError::SqlFileNotFound(path) => {
            log::warn!("Failed to {action}: SQL file {path} is missing");
            HttpResponse::NotFound().json(json!({ "error": "Report SQL file not found" }))
        }
        ServiceError::Form(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        ServiceError::ExternalStore(detail) => {
            log::error!("Failed to {action}: {detail}");
            if config.expose_error_details {
                HttpResponse::BadGateway()
                    .json(json!({ "error": "Reporting database failure", "detail": detail }))
            } else {
                HttpResponse::BadGateway().json(json!({ "error": "Reporting database failure" }))
            }
        }
        ServiceError::Io(detail) => {
            log::error!("Failed to {action}: {detail}");
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to write export file" }))
        }
        ServiceError::Internal(detail) => {
            log::error!("Failed to {action}: {detail}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
