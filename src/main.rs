use std::fs;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::logout;

use pushkind_logistics::config::ServerConfig;
use pushkind_logistics::db::establish_connection_pool;
use pushkind_logistics::export::TabFileExporter;
use pushkind_logistics::reporting::{ReportExecutor, SqlLoader};
use pushkind_logistics::repository::DieselRepository;
use pushkind_logistics::routes::orders::{
    api_v1_clear_order_lines, api_v1_create_order, api_v1_delete_order, api_v1_export_order,
    api_v1_order, api_v1_order_lines, api_v1_order_statuses, api_v1_orders, api_v1_update_order,
};
use pushkind_logistics::routes::projects::{
    api_v1_current_project, api_v1_project_counter, api_v1_projects,
};
use pushkind_logistics::routes::reports::{
    api_v1_ad_hoc_query, api_v1_execute_report, api_v1_inventory_report, api_v1_report,
    api_v1_reports,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &config.secret {
        Some(key) => Key::from(key.as_bytes()),
        None => Key::generate(),
    };

    let common_config = CommonServerConfig {
        secret: config.secret.clone().unwrap_or_default(),
        auth_service_url: config.auth_service_url.clone(),
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    if let Err(e) = fs::create_dir_all(&config.export_dir) {
        log::warn!(
            "Export directory {} is not available: {e}",
            config.export_dir.display()
        );
    }
    let exporter = TabFileExporter::new(config.export_dir.clone());
    let loader = SqlLoader::new(config.reports_sql_dir.clone());
    let executor = ReportExecutor::new(config.reports_database_url.clone());

    if config.expose_error_details {
        log::warn!("Reporting database errors are returned to API callers");
    }

    let address = config.address.clone();
    let port = config.port;
    let domain = config.domain.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/api")
                    .service(api_v1_projects)
                    .service(api_v1_current_project)
                    .service(api_v1_project_counter)
                    .service(api_v1_orders)
                    .service(api_v1_create_order)
                    .service(api_v1_order)
                    .service(api_v1_update_order)
                    .service(api_v1_delete_order)
                    .service(api_v1_order_lines)
                    .service(api_v1_clear_order_lines)
                    .service(api_v1_export_order)
                    .service(api_v1_order_statuses)
                    .service(api_v1_reports)
                    .service(api_v1_inventory_report)
                    .service(api_v1_report)
                    .service(api_v1_execute_report)
                    .service(api_v1_ad_hoc_query),
            )
            .service(logout)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(exporter.clone()))
            .app_data(web::Data::new(loader.clone()))
            .app_data(web::Data::new(executor.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
