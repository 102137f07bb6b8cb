// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poll-until-complete research runner.
//!
//! [`ResearchTaskRunner`] submits a prompt to a [`ResearchBackend`], then
//! polls its status at a fixed interval until the job reaches a terminal
//! state, the attempt cap is hit, or the caller cancels. Every way out of
//! the loop is a [`ResearchOutcome`]; nothing is raised past `run`.

use std::sync::Arc;
use std::time::Duration;

use architect_config::model::GeminiConfig;
use architect_core::{
    ArchitectError, JobHandle, JobSnapshot, JobStatus, ResearchBackend, ResearchOutcome,
    TaskRunner,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Text returned when the caller cancels a run.
pub const CANCELLED: &str = "Research cancelled";

/// Drives one research job from submission to a terminal outcome.
pub struct ResearchTaskRunner {
    backend: Arc<dyn ResearchBackend>,
    poll_interval: Duration,
    /// Zero means no cap.
    max_attempts: u32,
}

impl ResearchTaskRunner {
    pub fn new(backend: Arc<dyn ResearchBackend>, poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            backend,
            poll_interval,
            max_attempts,
        }
    }

    /// Builds a runner using the interval and cap from the `[gemini]` section.
    pub fn from_config(backend: Arc<dyn ResearchBackend>, config: &GeminiConfig) -> Self {
        Self::new(
            backend,
            Duration::from_secs(config.poll_interval_secs),
            config.max_poll_attempts,
        )
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    async fn poll(&self, handle: &JobHandle, cancel: &CancellationToken) -> ResearchOutcome {
        let mut attempts: u32 = 0;
        loop {
            if self.max_attempts != 0 && attempts >= self.max_attempts {
                warn!(job = handle.as_str(), attempts, "research poll cap reached");
                return ResearchOutcome::Failure(format!(
                    "Research Error: timed out after {attempts} polls"
                ));
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return cancelled(handle),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            attempts += 1;
            let snapshot = tokio::select! {
                biased;
                _ = cancel.cancelled() => return cancelled(handle),
                result = self.backend.get_status(handle) => result,
            };

            match snapshot {
                Ok(snapshot) => {
                    debug!(job = handle.as_str(), attempt = attempts, status = %snapshot.status, "research polled");
                    if let Some(outcome) = terminal_outcome(snapshot) {
                        info!(
                            job = handle.as_str(),
                            attempts,
                            success = outcome.is_success(),
                            "research finished"
                        );
                        return outcome;
                    }
                }
                Err(e) => {
                    warn!(job = handle.as_str(), error = %e, "research poll failed");
                    return api_error(&e);
                }
            }
        }
    }
}

#[async_trait]
impl TaskRunner for ResearchTaskRunner {
    async fn run(&self, prompt: &str, cancel: &CancellationToken) -> ResearchOutcome {
        let submitted = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("research cancelled before submission");
                return ResearchOutcome::Failure(CANCELLED.to_string());
            }
            result = self.backend.submit_job(prompt) => result,
        };

        let handle = match submitted {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "research submission failed");
                return api_error(&e);
            }
        };

        info!(job = handle.as_str(), "research job submitted");
        self.poll(&handle, cancel).await
    }
}

/// Maps a terminal snapshot to an outcome; `None` while still pending.
fn terminal_outcome(snapshot: JobSnapshot) -> Option<ResearchOutcome> {
    if !snapshot.status.is_terminal() {
        return None;
    }
    match snapshot.status {
        JobStatus::Pending => None,
        JobStatus::Completed => Some(match snapshot.outputs.into_iter().last() {
            Some(text) => ResearchOutcome::Success(text),
            None => ResearchOutcome::Failure("Research Error: completed without output".into()),
        }),
        JobStatus::Failed => {
            let detail = snapshot.error.unwrap_or_else(|| "unknown error".into());
            Some(ResearchOutcome::Failure(format!("Research Error: {detail}")))
        }
    }
}

fn api_error(e: &ArchitectError) -> ResearchOutcome {
    let detail = match e {
        ArchitectError::Research { message, .. } => message.clone(),
        other => other.to_string(),
    };
    ResearchOutcome::Failure(format!("Gemini API Error: {detail}"))
}

fn cancelled(handle: &JobHandle) -> ResearchOutcome {
    info!(job = handle.as_str(), "research cancelled");
    ResearchOutcome::Failure(CANCELLED.to_string())
}
