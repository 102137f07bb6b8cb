// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Bl1nk Architect.
//!
//! Routes:
//! - `GET /health`: unauthenticated liveness check
//! - `GET /auth/callback`: GitHub App installation callback
//! - `POST /github/webhook`: GitHub webhook acknowledgement
//! - `POST /poe` (configurable): Poe server-bot protocol, bearer-authenticated

pub mod auth;
pub mod handlers;
pub mod poe;
pub mod server;
pub mod sse;

pub use auth::AuthConfig;
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
