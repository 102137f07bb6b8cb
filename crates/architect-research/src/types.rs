// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Gemini Interactions API.

use architect_core::{JobSnapshot, JobStatus};
use serde::{Deserialize, Serialize};

/// Body of `POST /interactions`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateInteractionRequest<'a> {
    pub input: &'a str,
    pub agent: &'a str,
    pub background: bool,
}

/// An interaction as returned by create and get.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub outputs: Vec<InteractionOutput>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionOutput {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Error envelope of Google APIs.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub status: Option<String>,
    pub message: String,
}

impl Interaction {
    /// Maps the service's status vocabulary onto [`JobStatus`].
    ///
    /// `cancelled` counts as a failure; anything unrecognised (including
    /// `in_progress` and a missing status) is still pending.
    pub fn job_status(&self) -> JobStatus {
        match self.status.as_deref() {
            Some("completed") => JobStatus::Completed,
            Some("failed" | "cancelled") => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }

    pub fn into_snapshot(self) -> JobSnapshot {
        let status = self.job_status();
        let error = match (&self.error, status) {
            (Some(value), _) => Some(render_error(value)),
            (None, JobStatus::Failed) => self.status.clone(),
            (None, _) => None,
        };
        JobSnapshot {
            status,
            outputs: self.outputs.into_iter().filter_map(|o| o.text).collect(),
            error,
        }
    }
}

/// Flattens an error payload, which may be a bare string or an object.
fn render_error(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Interaction {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn completed_interaction_keeps_text_outputs() {
        let snapshot = parse(
            r#"{"id":"i1","status":"completed","outputs":[
                {"type":"thought","text":"thinking"},
                {"type":"image"},
                {"type":"text","text":"final report"}]}"#,
        )
        .into_snapshot();
        assert_eq!(snapshot.status, JobStatus::Completed);
        assert_eq!(snapshot.outputs, vec!["thinking", "final report"]);
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn failed_interaction_renders_object_error() {
        let snapshot = parse(
            r#"{"id":"i1","status":"failed","error":{"code":429,"message":"rate limited"}}"#,
        )
        .into_snapshot();
        assert_eq!(snapshot.status, JobStatus::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn failed_interaction_accepts_string_error() {
        let snapshot = parse(r#"{"id":"i1","status":"failed","error":"quota"}"#).into_snapshot();
        assert_eq!(snapshot.error.as_deref(), Some("quota"));
    }

    #[test]
    fn cancelled_without_detail_reports_status() {
        let snapshot = parse(r#"{"id":"i1","status":"cancelled"}"#).into_snapshot();
        assert_eq!(snapshot.status, JobStatus::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("cancelled"));
    }

    #[test]
    fn unknown_status_is_pending() {
        assert_eq!(parse(r#"{"id":"i1","status":"in_progress"}"#).job_status(), JobStatus::Pending);
        assert_eq!(parse(r#"{"id":"i1"}"#).job_status(), JobStatus::Pending);
    }
}
