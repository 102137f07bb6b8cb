// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Bl1nk Architect.

use thiserror::Error;

/// The primary error type shared by every collaborator and the gateway.
#[derive(Debug, Error)]
pub enum ArchitectError {
    /// Configuration errors (missing credentials, unreadable key files, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// GitHub App API errors (JWT signing, token exchange, repository listing).
    #[error("github error: {message}")]
    GitHub {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generative-AI backend errors (job submission, status polling, malformed responses).
    #[error("research error: {message}")]
    Research {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP gateway errors (bind failure, server crash).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Rejected login callback state (bad signature, expired, malformed).
    #[error("authorization error: {0}")]
    Authorization(String),

    /// An outbound request exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ArchitectError {
    /// Shorthand for a [`ArchitectError::GitHub`] without an underlying source.
    pub fn github(message: impl Into<String>) -> Self {
        Self::GitHub {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`ArchitectError::Research`] without an underlying source.
    pub fn research(message: impl Into<String>) -> Self {
        Self::Research {
            message: message.into(),
            source: None,
        }
    }
}
