//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Blog API Server on {}:{}{}",
        config.host,
        config.port,
        config.base_path
    );

    // Build application state
    let state = AppState::new(&config).await;
    let base_path = config.base_path.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(handlers::cors_headers())
            .wrap(TracingLogger::default())
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .app_data(web::Data::new(state.clone()))
            .service(web::scope(&base_path).configure(handlers::configure_routes))
            .default_service(web::to(handlers::fallback))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
