//! Runtime configuration read from the process environment.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable without a sensible default is not set.
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    #[error("{name} has invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Settings shared by every request handler.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path of the primary SQLite database.
    pub database_url: String,
    /// Connection URL of the external reporting database.
    pub reports_database_url: String,
    /// Base directory holding `{category}/{file_path}` SQL templates.
    pub reports_sql_dir: PathBuf,
    /// Directory (usually a network share) receiving order export files.
    pub export_dir: PathBuf,
    /// Whether reporting store diagnostics are returned to API callers.
    pub expose_error_details: bool,
    pub address: String,
    pub port: u16,
    pub domain: String,
    pub secret: Option<String>,
    pub auth_service_url: String,
}

impl ServerConfig {
    /// Build the configuration from environment variables, applying defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            Err(_) => 8080,
        };

        let auth_service_url =
            env::var("AUTH_SERVICE_URL").map_err(|_| ConfigError::Missing("AUTH_SERVICE_URL"))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or("app.db".to_string()),
            reports_database_url: env::var("REPORTS_DATABASE_URL")
                .unwrap_or("sqlite://reporting.db".to_string()),
            reports_sql_dir: env::var("REPORTS_SQL_DIR")
                .unwrap_or("reports/sql".to_string())
                .into(),
            export_dir: env::var("ORDER_EXPORT_DIR")
                .unwrap_or("exports".to_string())
                .into(),
            expose_error_details: env::var("EXPOSE_ERROR_DETAILS")
                .map(|value| parse_flag(&value))
                .unwrap_or(false),
            address: env::var("ADDRESS").unwrap_or("127.0.0.1".to_string()),
            port,
            domain: env::var("DOMAIN").unwrap_or("localhost".to_string()),
            secret: env::var("SECRET_KEY").ok(),
            auth_service_url,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
