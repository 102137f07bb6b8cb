// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini Interactions API.
//!
//! Provides [`GeminiClient`], which submits background research
//! interactions and fetches their status. It implements
//! [`ResearchBackend`] for use by the task runner.

use std::time::Duration;

use architect_config::model::GeminiConfig;
use architect_core::{ArchitectError, JobHandle, JobSnapshot, ResearchBackend};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::types::{ApiErrorResponse, CreateInteractionRequest, Interaction};

/// HTTP client for the Gemini research agent.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    agent: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - Google API key, sent as `x-goog-api-key`
    /// * `agent` - research agent identifier
    /// * `base_url` - API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    /// * `timeout` - per-request timeout
    pub fn new(
        api_key: &SecretString,
        agent: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ArchitectError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| ArchitectError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ArchitectError::Research {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Creates a client from the `[gemini]` section.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, ArchitectError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ArchitectError::Config(
                    "Gemini API key not found. Set gemini.api_key in config or GOOGLE_API_KEY environment variable.".into(),
                )
            })?;

        Self::new(
            &SecretString::from(api_key.to_string()),
            config.agent.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Creates a background interaction for `prompt`.
    pub async fn create_interaction(&self, prompt: &str) -> Result<Interaction, ArchitectError> {
        let body = CreateInteractionRequest {
            input: prompt,
            agent: &self.agent,
            background: true,
        };
        let response = self
            .client
            .post(format!("{}/interactions", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_failed(e))?;
        read_interaction(response).await
    }

    fn request_failed(&self, e: reqwest::Error) -> ArchitectError {
        if e.is_timeout() {
            return ArchitectError::Timeout {
                duration: self.timeout,
            };
        }
        ArchitectError::Research {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }

    /// Fetches the interaction named `id`.
    pub async fn get_interaction(&self, id: &str) -> Result<Interaction, ArchitectError> {
        let response = self
            .client
            .get(format!("{}/interactions/{id}", self.base_url))
            .send()
            .await
            .map_err(|e| self.request_failed(e))?;
        read_interaction(response).await
    }
}

#[async_trait]
impl ResearchBackend for GeminiClient {
    async fn submit_job(&self, prompt: &str) -> Result<JobHandle, ArchitectError> {
        let interaction = self.create_interaction(prompt).await?;
        debug!(
            interaction = interaction.id.as_str(),
            agent = self.agent.as_str(),
            "research interaction created"
        );
        Ok(JobHandle(interaction.id))
    }

    async fn get_status(&self, handle: &JobHandle) -> Result<JobSnapshot, ArchitectError> {
        let interaction = self.get_interaction(handle.as_str()).await?;
        Ok(interaction.into_snapshot())
    }
}

async fn read_interaction(response: reqwest::Response) -> Result<Interaction, ArchitectError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| ArchitectError::Research {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!(
                "Gemini API error ({}): {}",
                api_err.error.status.as_deref().unwrap_or(status.as_str()),
                api_err.error.message
            ),
            Err(_) => format!("API returned {status}: {body}"),
        };
        return Err(ArchitectError::research(message));
    }

    serde_json::from_str(&body).map_err(|e| ArchitectError::Research {
        message: format!("failed to parse API response: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use architect_core::JobStatus;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new(
            &SecretString::from("test-key".to_string()),
            "deep-research-test".into(),
            format!("{base_url}/"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn submit_sends_background_interaction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/interactions"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_json(serde_json::json!({
                "input": "audit my repo",
                "agent": "deep-research-test",
                "background": true
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "int-1", "status": "in_progress"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let handle = test_client(&server.uri())
            .submit_job("audit my repo")
            .await
            .unwrap();
        assert_eq!(handle, JobHandle::from("int-1"));
    }

    #[tokio::test]
    async fn status_maps_completed_outputs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/interactions/int-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "int-9",
                "status": "completed",
                "outputs": [{"type": "text", "text": "report"}]
            })))
            .mount(&server)
            .await;

        let snapshot = test_client(&server.uri())
            .get_status(&JobHandle::from("int-9"))
            .await
            .unwrap();
        assert_eq!(snapshot.status, JobStatus::Completed);
        assert_eq!(snapshot.outputs, vec!["report"]);
    }

    #[tokio::test]
    async fn api_error_body_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/interactions"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": 403, "status": "PERMISSION_DENIED", "message": "API key invalid"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .submit_job("x")
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("PERMISSION_DENIED"), "got: {err}");
        assert!(err.contains("API key invalid"), "got: {err}");
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/interactions/bad"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .get_status(&JobHandle::from("bad"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[tokio::test]
    async fn slow_response_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/interactions/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "slow", "status": "in_progress"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;
        let client = GeminiClient::new(
            &SecretString::from("test-key".to_string()),
            "deep-research-test".into(),
            server.uri(),
            Duration::from_millis(100),
        )
        .unwrap();

        let err = client
            .get_status(&JobHandle::from("slow"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ArchitectError::Timeout { duration } if duration == Duration::from_millis(100)),
            "got: {err:?}"
        );
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = GeminiClient::from_config(&GeminiConfig::default()).unwrap_err();
        assert!(matches!(err, ArchitectError::Config(msg) if msg.contains("GOOGLE_API_KEY")));
    }
}
