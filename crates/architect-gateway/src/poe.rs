// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poe server-bot protocol.
//!
//! Every request is a JSON object with a `type` field. Queries are answered
//! with an SSE stream; everything else with plain JSON.

use std::collections::BTreeMap;

use architect_core::UserId;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::handlers::ErrorResponse;
use crate::server::GatewayState;
use crate::sse;

/// A Poe protocol request.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoeRequest {
    Query(QueryRequest),
    Settings(SettingsRequest),
    ReportFeedback(ReportRequest),
    ReportError(ReportRequest),
    #[serde(other)]
    Unknown,
}

/// Body of a `query` request.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub version: String,
    pub query: Vec<ProtocolMessage>,
    pub user_id: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub message_id: String,
}

/// One message of the conversation so far.
#[derive(Debug, Deserialize)]
pub struct ProtocolMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsRequest {
    #[serde(default)]
    pub version: String,
}

/// Body of `report_feedback` and `report_error`; kept as raw JSON for logging.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Reply to a `settings` request.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub introduction_message: String,
    pub server_bot_dependencies: BTreeMap<String, u32>,
    pub allow_attachments: bool,
}

impl SettingsResponse {
    pub fn new(introduction_message: impl Into<String>) -> Self {
        Self {
            introduction_message: introduction_message.into(),
            server_bot_dependencies: BTreeMap::from([("Gemini-1.5-Pro".to_string(), 1)]),
            allow_attachments: true,
        }
    }
}

/// POST {poe.path}
pub async fn post_poe(
    State(state): State<GatewayState>,
    Json(request): Json<PoeRequest>,
) -> Response {
    match request {
        PoeRequest::Query(query) => {
            let Some(last) = query.query.last() else {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "query must contain at least one message".to_string(),
                    }),
                )
                    .into_response();
            };
            tracing::info!(
                user = query.user_id.as_str(),
                conversation = query.conversation_id.as_str(),
                message = query.message_id.as_str(),
                role = last.role.as_str(),
                "poe query received"
            );
            let chunks = state
                .dispatcher
                .dispatch(UserId(query.user_id), last.content.clone());
            sse::stream_chunks(chunks).into_response()
        }
        PoeRequest::Settings(_) => Json(state.settings.as_ref().clone()).into_response(),
        PoeRequest::ReportFeedback(report) => {
            tracing::info!(report = ?report.fields, "poe feedback reported");
            Json(serde_json::json!({})).into_response()
        }
        PoeRequest::ReportError(report) => {
            tracing::warn!(report = ?report.fields, "poe client reported an error");
            Json(serde_json::json!({})).into_response()
        }
        PoeRequest::Unknown => (
            StatusCode::NOT_IMPLEMENTED,
            Json(ErrorResponse {
                error: "unsupported request type".to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_request() {
        let request: PoeRequest = serde_json::from_value(serde_json::json!({
            "version": "1.0",
            "type": "query",
            "query": [
                {"role": "user", "content": "hello", "content_type": "text/markdown"},
                {"role": "bot", "content": "hi"},
                {"role": "user", "content": "Start"}
            ],
            "user_id": "u-1",
            "conversation_id": "c-1",
            "message_id": "m-1"
        }))
        .unwrap();

        let PoeRequest::Query(query) = request else {
            panic!("expected query");
        };
        assert_eq!(query.user_id, "u-1");
        assert_eq!(query.query.last().unwrap().content, "Start");
    }

    #[test]
    fn parses_other_request_types() {
        let settings: PoeRequest =
            serde_json::from_value(serde_json::json!({"type": "settings", "version": "1.0"})).unwrap();
        assert!(matches!(settings, PoeRequest::Settings(_)));

        let feedback: PoeRequest = serde_json::from_value(serde_json::json!({
            "type": "report_feedback",
            "message_id": "m-1",
            "feedback_type": "like"
        }))
        .unwrap();
        let PoeRequest::ReportFeedback(report) = feedback else {
            panic!("expected feedback");
        };
        assert_eq!(report.fields["feedback_type"], "like");

        let unknown: PoeRequest =
            serde_json::from_value(serde_json::json!({"type": "report_reaction"})).unwrap();
        assert!(matches!(unknown, PoeRequest::Unknown));
    }

    #[test]
    fn settings_response_shape() {
        insta::assert_json_snapshot!(SettingsResponse::new("Hello!"), @r#"
        {
          "introduction_message": "Hello!",
          "server_bot_dependencies": {
            "Gemini-1.5-Pro": 1
          },
          "allow_attachments": true
        }
        "#);
    }
}
