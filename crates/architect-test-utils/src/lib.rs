// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Bl1nk Architect.
//!
//! Provides mock collaborators for fast, deterministic tests without
//! GitHub or Gemini.
//!
//! # Components
//!
//! - [`ScriptedResearchBackend`] - research backend replaying a fixed status script
//! - [`StubTaskRunner`] - task runner returning a canned outcome
//! - [`StaticRepositoryLister`] - repository lister returning fixed paths or an error

pub mod mock_backend;
pub mod mock_github;
pub mod mock_runner;

pub use mock_backend::ScriptedResearchBackend;
pub use mock_github::StaticRepositoryLister;
pub use mock_runner::StubTaskRunner;
