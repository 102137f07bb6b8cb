// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Bl1nk Architect.
//!
//! Holds the shared error type, the domain types that flow between the
//! chat gateway and the research workflow, and the collaborator traits that
//! the GitHub and generative-AI clients implement.

pub mod error;
pub mod traits;
pub mod types;

pub use error::ArchitectError;
pub use traits::{RepositoryLister, ResearchBackend, SessionStore, TaskRunner};
pub use types::{
    InstallationId, JobHandle, JobSnapshot, JobStatus, ResearchOutcome, ResponseChunk,
    ResponseMeta, UserId,
};
