// ABOUTME: Calgate web service: Google sign-in issuing bearer credentials that gate calendar endpoints
// ABOUTME: Exposes router construction for tests and run_server for the binary

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod state;

#[cfg(test)]
mod tests;

pub use config::{Config, ConfigError};
pub use error::{ApiResult, AppError};
pub use state::AppState;

/// Router plus the cross-cutting layers used in production.
pub fn build_app(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?,
        )
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Ok(api::create_router(state)
        .layer(middleware::security_headers())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::create_panic_handler()))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    info!(config = ?config, "Starting Calgate server");

    let state = AppState::from_config(&config).await?;
    let app = build_app(state, &config.cors_origin)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
