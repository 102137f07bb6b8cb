// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types passed between the gateway, the workflow, and the collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque identifier of a chat end-user, supplied by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Opaque GitHub App installation identifier granted by a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstallationId(pub String);

/// Handle assigned by the generative-AI service to a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle(pub String);

macro_rules! string_newtype {
    ($($name:ident),*) => {
        $(
            impl $name {
                /// Borrow the inner string.
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }

            impl From<String> for $name {
                fn from(value: String) -> Self {
                    Self(value)
                }
            }
        )*
    };
}

string_newtype!(UserId, InstallationId, JobHandle);

/// Lifecycle status of a research job as reported by the backend.
///
/// `Pending` is the only non-terminal state; a job moves to exactly one of
/// `Completed` or `Failed` and never returns to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    /// Returns true once the job can no longer change state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// One observation of a research job's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    /// Text outputs produced so far, oldest first.
    pub outputs: Vec<String>,
    /// Error detail, set when `status` is `Failed`.
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn pending() -> Self {
        Self {
            status: JobStatus::Pending,
            outputs: Vec::new(),
            error: None,
        }
    }

    pub fn completed(output: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            outputs: vec![output.into()],
            error: None,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            outputs: Vec::new(),
            error: Some(detail.into()),
        }
    }
}

/// Result of a research run. Failures are ordinary content, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResearchOutcome {
    Success(String),
    Failure(String),
}

impl ResearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ResearchOutcome::Success(_))
    }

    /// The user-visible text of this outcome.
    pub fn text(&self) -> &str {
        match self {
            ResearchOutcome::Success(text) | ResearchOutcome::Failure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ResearchOutcome::Success(text) | ResearchOutcome::Failure(text) => text,
        }
    }
}

/// Response format declaration sent before any text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub content_type: String,
    pub linkify: bool,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            content_type: "text/markdown".to_string(),
            linkify: true,
        }
    }
}

/// A single ordered unit of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseChunk {
    /// Format preamble; always the first chunk of a reply.
    Meta(ResponseMeta),
    /// A piece of reply text.
    Text(String),
}

impl ResponseChunk {
    pub fn text(text: impl Into<String>) -> Self {
        ResponseChunk::Text(text.into())
    }

    /// Returns the text of a `Text` chunk.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseChunk::Text(text) => Some(text),
            ResponseChunk::Meta(_) => None,
        }
    }
}
