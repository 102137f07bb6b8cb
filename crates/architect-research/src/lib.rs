// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini deep-research integration for Bl1nk Architect.
//!
//! [`GeminiClient`] talks to the Interactions API and implements
//! [`ResearchBackend`](architect_core::ResearchBackend).
//! [`ResearchTaskRunner`] wraps any backend in the cooperative
//! submit-then-poll loop the workflow relies on.

pub mod client;
pub mod runner;
pub mod types;

pub use client::GeminiClient;
pub use runner::{ResearchTaskRunner, CANCELLED};
