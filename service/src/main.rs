//! Air traffic data service.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AIRTRAFFIC_CONFIG` | JSON file with endpoints and named clients | empty config |
//! | `PORT` | HTTP server port | 8080 |
//! | `ALLOWED_HOSTS` | Comma-separated CORS origins | any |
//! | `LOG_FORMAT` | `json` or `text` | `json` |
//! | `RUST_LOG` | Log filter | `info` |

use std::net::SocketAddr;
use std::sync::Arc;

use airtraffic_core::AppConfig;
use airtraffic_service::{
    app,
    logging::{init_logging, LoggingConfig},
    AppState, ServiceConfig,
};
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(&LoggingConfig::from_env());

    let service = ServiceConfig::from_env();
    let config = AppConfig::from_env().context("loading endpoint configuration")?;
    let state = AppState::from_config(config).context("building named clients")?;

    tracing::info!(
        port = service.port,
        endpoints = state.config.endpoints.len(),
        clients = state.config.clients.len(),
        "Starting air traffic data service"
    );

    let router = app(Arc::new(state), &service);
    let addr = SocketAddr::from(([0, 0, 0, 0], service.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
