// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stub task runner returning a canned outcome.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use architect_core::{ResearchOutcome, TaskRunner};

/// A task runner that records prompts and returns a fixed outcome.
pub struct StubTaskRunner {
    outcome: ResearchOutcome,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubTaskRunner {
    pub fn new(outcome: ResearchOutcome) -> Self {
        Self {
            outcome,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Runner whose every run succeeds with `text`.
    pub fn succeeding(text: &str) -> Self {
        Self::new(ResearchOutcome::Success(text.to_string()))
    }

    /// Runner whose every run fails with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self::new(ResearchOutcome::Failure(reason.to_string()))
    }

    /// Prompts passed to `run`, oldest first.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl TaskRunner for StubTaskRunner {
    async fn run(&self, prompt: &str, _cancel: &CancellationToken) -> ResearchOutcome {
        self.prompts.lock().await.push(prompt.to_string());
        self.outcome.clone()
    }
}
