// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use helpline_agent::SupportAgent;
use helpline_core::{HelplineError, PluginAdapter};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::session_middleware;
use crate::{admin, handlers};

/// Health state for unauthenticated health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
    /// Adapters reported by `/health`.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            prometheus_render: None,
            adapters: Vec::new(),
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub agent: Arc<SupportAgent>,
    pub health: HealthState,
}

/// Gateway server configuration (mirrors `ServerConfig` from helpline-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the full route tree.
///
/// - `/health`, `/metrics`: unauthenticated
/// - `/conversations/*`, `/patterns/{id}/feedback`: the chat widget
/// - `/admin/auth/*`: code login
/// - every other `/admin/*` route: bearer session required
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .route(
            "/conversations/{client_id}/messages",
            post(handlers::post_message).get(handlers::get_history),
        )
        .route("/conversations/{client_id}/poll", get(handlers::get_poll))
        .route("/patterns/{id}/feedback", post(handlers::post_feedback))
        .route("/admin/auth/request-code", post(admin::post_request_code))
        .route("/admin/auth/verify-code", post(admin::post_verify_code))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/admin/poll", get(admin::get_poll))
        .route("/admin/conversations", get(admin::get_conversations))
        .route(
            "/admin/conversations/{id}/takeover",
            post(admin::post_takeover),
        )
        .route("/admin/conversations/{id}/respond", post(admin::post_respond))
        .route("/admin/conversations/{id}/release", post(admin::post_release))
        .route("/admin/analytics", get(admin::get_analytics))
        .route("/admin/performance", get(admin::get_performance))
        .route(
            "/admin/patterns",
            get(admin::get_patterns).post(admin::post_pattern),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), HelplineError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HelplineError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| HelplineError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }

    #[test]
    fn health_state_starts_empty() {
        let health = HealthState::default();
        assert!(health.prometheus_render.is_none());
        assert!(health.adapters.is_empty());
    }
}
