// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the GitHub side and health.
//!
//! Handles GET /health, GET /auth/callback, POST /github/webhook.

use architect_core::InstallationId;
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::auth::verify_webhook_signature;
use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters GitHub sends after an app installation.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub installation_id: String,
    pub state: String,
    #[serde(default)]
    pub setup_action: Option<String>,
}

const CONNECTED_PAGE: &str = r#"<!doctype html>
<html>
<body style="background:#0d1117; color:#c9d1d9; font-family:sans-serif; text-align:center; padding-top:50px;">
    <h1>✅ Connected!</h1>
    <p>You can close this window and go back to Poe.</p>
</body>
</html>
"#;

const REJECTED_PAGE: &str = r#"<!doctype html>
<html>
<body style="background:#0d1117; color:#c9d1d9; font-family:sans-serif; text-align:center; padding-top:50px;">
    <h1>❌ Authorization failed</h1>
    <p>This link is invalid or has expired. Go back to Poe and request a new one.</p>
</body>
</html>
"#;

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /auth/callback
///
/// Missing parameters are rejected with 400 by the extractor.
pub async fn get_auth_callback(
    State(state): State<GatewayState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    tracing::debug!(
        setup_action = params.setup_action.as_deref().unwrap_or(""),
        "github app callback"
    );
    match state
        .dispatcher
        .gate()
        .handle_callback(&params.state, InstallationId(params.installation_id))
        .await
    {
        Ok(_) => Html(CONNECTED_PAGE).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, Html(REJECTED_PAGE)).into_response(),
    }
}

/// POST /github/webhook
pub async fn post_github_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = state.webhook_secret.as_ref() {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !verify_webhook_signature(secret, &body, signature) {
            tracing::warn!("github webhook rejected: bad signature");
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "invalid signature".to_string(),
                }),
            )
                .into_response();
        }
    }

    let event = headers
        .get("x-github-event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    tracing::info!(event, bytes = body.len(), "github webhook received");
    Json(serde_json::json!({"status": "ok"})).into_response()
}
