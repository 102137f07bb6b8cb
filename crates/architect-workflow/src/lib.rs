// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat workflow for Bl1nk Architect.
//!
//! The [`WorkflowDispatcher`] turns one incoming chat message into an
//! ordered stream of [`ResponseChunk`](architect_core::ResponseChunk)s:
//! - a markdown preamble
//! - a login prompt for users without a GitHub App installation
//! - otherwise a status line followed by the research result
//!
//! [`AuthorizationGate`] owns the login-URL and callback half of the
//! GitHub App flow, on top of any [`SessionStore`](architect_core::SessionStore).

pub mod auth;
pub mod dispatcher;
pub mod session;

pub use auth::AuthorizationGate;
pub use dispatcher::{RepositoryContext, WorkflowDispatcher};
pub use session::InMemorySessionStore;
