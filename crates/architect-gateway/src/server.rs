// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use architect_core::ArchitectError;
use architect_workflow::WorkflowDispatcher;
use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;
use crate::poe::{self, SettingsResponse};

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub dispatcher: Arc<WorkflowDispatcher>,
    /// Reply to Poe `settings` requests.
    pub settings: Arc<SettingsResponse>,
    /// GitHub webhook secret (None = signatures not checked).
    pub webhook_secret: Option<SecretString>,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Gateway server configuration (mirrors the `[gateway]` and `[poe]` sections).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path of the Poe endpoint, e.g. `/poe`.
    pub poe_path: String,
}

/// Builds the router with all routes and layers.
pub fn build_router(config: &ServerConfig, state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    // Unauthenticated routes; GitHub callbacks carry their own proof.
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/auth/callback", get(handlers::get_auth_callback))
        .route("/github/webhook", post(handlers::post_github_webhook))
        .with_state(state.clone());

    let poe_routes = Router::new()
        .route(&config.poe_path, post(poe::post_poe))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(poe_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
///
/// Serves until `shutdown` is cancelled, then drains in-flight requests.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), ArchitectError> {
    let app = build_router(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ArchitectError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(poe_path = config.poe_path.as_str(), "Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ArchitectError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway server stopped");
    Ok(())
}
