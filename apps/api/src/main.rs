//! Tasklane API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use tasklane_application::BootstrapReport;
use tasklane_core::AppError;
use tracing::info;

use crate::api_config::{ApiCommand, ApiConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool =
        api_services::connect_and_migrate(&config.database_url, config.database_max_connections)
            .await?;
    let app_state = api_services::build_app_state(pool.clone(), &config);

    match config.command {
        ApiCommand::Migrate => {
            let report = app_state.rbac_bootstrap_service.run().await;
            info!(
                summary = %bootstrap_summary(&report),
                "database migrations and rbac bootstrap applied"
            );
            return Ok(());
        }
        ApiCommand::SeedDev => {
            let _ = app_state.rbac_bootstrap_service.run().await;
            dev_seed::run(&app_state).await?;
            info!("development seed data applied");
            return Ok(());
        }
        ApiCommand::Serve => {
            if config.rbac_bootstrap_on_start {
                let _ = app_state.rbac_bootstrap_service.run().await;
            }
        }
    }

    let session_layer = api_services::build_postgres_session_layer(pool, &config).await?;
    let app = api_router::build_router(app_state, &config.frontend_url, session_layer)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "tasklane-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn bootstrap_summary(report: &BootstrapReport) -> String {
    format!(
        "{} roles created, {} populated, {} failures",
        report.roles_created.len(),
        report.roles_populated.len(),
        report.failures
    )
}
