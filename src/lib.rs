pub mod config;
pub mod db;
pub mod domain;
pub mod export;
pub mod forms;
pub mod models;
pub mod reporting;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role required to use the logistics service at all.
pub const SERVICE_ACCESS_ROLE: &str = "logistics";

/// Role required for the unrestricted query console.
pub const QUERY_CONSOLE_ROLE: &str = "admin";
