//! Products API - REST server for the product catalog

use axum_helpers::{
    cors_from_env,
    server::{create_production_app, create_router, health_router},
};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = connect_from_config_with_retry(config.postgres.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        run_migrations::<migration::Migrator>(&db, config.app.name).await?;
    } else {
        info!("RUN_MIGRATIONS disabled, skipping migrations");
    }

    let state = AppState { db };

    let cors = cors_from_env(&config.environment)?;
    let app = create_router::<openapi::ApiDoc>(api::routes(&state), cors)
        .merge(health_router(config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        name = config.app.name,
        version = config.app.version,
        port = config.server.port,
        "Starting Products API"
    );

    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing PostgreSQL pool");
        if let Err(e) = state.db.close().await {
            tracing::warn!(error = %e, "Failed to close PostgreSQL pool");
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
