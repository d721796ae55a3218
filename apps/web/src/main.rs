//! # DevDiary Web
//!
//! Actix-web server that fronts the blog API: sessions, form validation and
//! post listings.

use actix_web::{App, HttpServer, error::JsonPayloadError, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::error::AppError;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting DevDiary web server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).context("failed to build the blog API client")?;

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("server error")
}

/// Malformed JSON bodies answer with the same error shape as everything else.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = match &err {
            JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
            other => other.to_string(),
        };
        AppError::BadRequest(detail).into()
    })
}
