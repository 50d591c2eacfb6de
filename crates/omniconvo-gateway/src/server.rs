// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use omniconvo_core::OmniError;
use omniconvo_mcp_server::McpServer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub server: Arc<McpServer>,
}

/// Bind address for the gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the gateway routes:
/// - POST /api/mcp
/// - GET /api/mcp and GET /health (liveness)
/// - GET /api/conversation/{id}
pub fn router(state: GatewayState) -> Router {
    let mcp_routes = Router::new()
        .route(
            "/api/mcp",
            post(handlers::post_mcp).get(handlers::get_health),
        )
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let viewer_routes = Router::new()
        .route("/api/conversation/{id}", get(handlers::get_conversation))
        .with_state(state);

    Router::new()
        .merge(mcp_routes)
        .merge(viewer_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serves the gateway until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), OmniError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| OmniError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| OmniError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
