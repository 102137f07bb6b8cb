// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The workflow only talks to the outside world through these seams, so
//! every external service can be swapped for a mock in tests.

pub mod repository;
pub mod research;
pub mod session;

pub use repository::RepositoryLister;
pub use research::{ResearchBackend, TaskRunner};
pub use session::SessionStore;
