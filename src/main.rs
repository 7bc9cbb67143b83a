// src/main.rs
use dotenv::dotenv;
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod app;
mod auth;
mod common;
mod logging_middleware;
mod payments;
mod recipes;
mod services;

#[cfg(test)]
mod test_support;

use common::{AppConfig, AppState};

const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env();
    info!(endpoint = %config.graphql_endpoint, "GraphQL endpoint configured");

    if config.admin_secret.is_none() {
        warn!("HASURA_ADMIN_SECRET is not set; admin GraphQL calls go out without it");
    }
    if config.chapa.secret_key.is_none() {
        warn!("CHAPA_SECRET_KEY is not set; payment routes will answer 503");
    }

    // ========================================================================
    // DIRECTORY SETUP
    // ========================================================================

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    info!(dir = %config.upload_dir.display(), "Upload directory ready");

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().timeout(OUTBOUND_TIMEOUT).build()?;
    let port = config.port;
    let shared = Arc::new(AppState::new(config, http_client));

    if !shared.tokens.is_configured() {
        warn!("JWT_SECRET is not set; registration, login and protected routes will fail");
    }

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let app = app::build_router(shared);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
