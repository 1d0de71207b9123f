//! HTTP shell for the air traffic data service.
//!
//! Holds the composition root's output: the loaded `AppConfig` and an
//! `EndpointInvoker` over the configured named clients, shared with handlers
//! through `AppState`. Everything is built explicitly in `main`.

pub mod logging;

use std::sync::Arc;

use airtraffic_core::{AppConfig, ConfigError, EndpointInvoker, ReqwestRegistry};
use axum::{
    http::HeaderValue,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers.
pub struct AppState {
    pub config: AppConfig,
    pub invoker: EndpointInvoker<ReqwestRegistry>,
}

impl AppState {
    /// Build the registry and invoker from `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let registry = ReqwestRegistry::from_config(&config.clients)?;
        Ok(Self {
            config,
            invoker: EndpointInvoker::new(registry),
        })
    }
}

/// Service settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `PORT`, default 8080.
    pub port: u16,
    /// `ALLOWED_HOSTS`, comma-separated. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            allowed_origins: Vec::new(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("ALLOWED_HOSTS").ok().as_deref(),
        )
    }

    pub fn from_vars(port: Option<&str>, allowed_hosts: Option<&str>) -> Self {
        let port = port.and_then(|s| s.parse().ok()).unwrap_or(8080);
        let allowed_origins = allowed_hosts
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty() && *origin != "*")
            .map(str::to_string)
            .collect();
        Self {
            port,
            allowed_origins,
        }
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        let allow_origin = if origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(origins)
        };
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_headers(Any)
            .allow_methods(Any)
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Names of the configured downstream endpoints.
    pub endpoints: Vec<String>,
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: state.config.endpoints.keys().cloned().collect(),
    })
}

pub fn app(state: Arc<AppState>, service: &ServiceConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .layer(service.cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
