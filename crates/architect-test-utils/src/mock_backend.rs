// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted research backend.
//!
//! `ScriptedResearchBackend` implements `ResearchBackend` by replaying a
//! queue of status results, so poll loops can be driven step by step.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use architect_core::{ArchitectError, JobHandle, JobSnapshot, ResearchBackend};

/// A research backend that replays pre-configured poll results.
///
/// Each `get_status` pops the next entry. An `Err(msg)` entry is returned
/// as a research error. Once the script is exhausted the job stays pending.
pub struct ScriptedResearchBackend {
    script: Arc<Mutex<VecDeque<Result<JobSnapshot, String>>>>,
    submit_error: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
    polls: AtomicUsize,
}

impl ScriptedResearchBackend {
    /// Create a backend that answers polls from `script` in order.
    pub fn new(script: Vec<Result<JobSnapshot, String>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from(script))),
            submit_error: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
            polls: AtomicUsize::new(0),
        }
    }

    /// Create a backend that completes on the first poll with `text`.
    pub fn completing(text: &str) -> Self {
        Self::new(vec![Ok(JobSnapshot::completed(text))])
    }

    /// Create a backend whose job never leaves `Pending`.
    pub fn never_finishing() -> Self {
        Self::new(Vec::new())
    }

    /// Create a backend that rejects every submission with `message`.
    pub fn failing_submit(message: &str) -> Self {
        Self {
            submit_error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Number of `get_status` calls made so far.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    /// Prompts received by `submit_job`, oldest first.
    pub async fn submitted_prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl ResearchBackend for ScriptedResearchBackend {
    async fn submit_job(&self, prompt: &str) -> Result<JobHandle, ArchitectError> {
        if let Some(message) = &self.submit_error {
            return Err(ArchitectError::research(message.clone()));
        }
        let mut prompts = self.prompts.lock().await;
        prompts.push(prompt.to_string());
        Ok(JobHandle(format!("scripted-{}", prompts.len())))
    }

    async fn get_status(&self, _handle: &JobHandle) -> Result<JobSnapshot, ArchitectError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().await.pop_front() {
            Some(Ok(snapshot)) => Ok(snapshot),
            Some(Err(message)) => Err(ArchitectError::research(message)),
            None => Ok(JobSnapshot::pending()),
        }
    }
}
