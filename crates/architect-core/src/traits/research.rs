// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traits for long-running research jobs.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ArchitectError;
use crate::types::{JobHandle, JobSnapshot, ResearchOutcome};

/// A generative-AI service that runs jobs in the background.
#[async_trait]
pub trait ResearchBackend: Send + Sync + 'static {
    /// Submits `prompt` and returns the handle of the created job.
    async fn submit_job(&self, prompt: &str) -> Result<JobHandle, ArchitectError>;

    /// Fetches the current state of a submitted job.
    async fn get_status(&self, handle: &JobHandle) -> Result<JobSnapshot, ArchitectError>;
}

/// Runs one research prompt to completion.
///
/// Implementations never fail: every error is folded into
/// [`ResearchOutcome::Failure`] so the caller can display it.
#[async_trait]
pub trait TaskRunner: Send + Sync + 'static {
    /// Runs `prompt`, suspending cooperatively until a terminal outcome,
    /// or until `cancel` fires.
    async fn run(&self, prompt: &str, cancel: &CancellationToken) -> ResearchOutcome;
}
