// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the subset of the GitHub REST API this crate uses.

use serde::{Deserialize, Serialize};

/// JWT claims identifying the GitHub App itself.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppClaims {
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Response of `POST /app/installations/{id}/access_tokens`.
#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Response of `GET /installation/repositories`.
#[derive(Debug, Deserialize)]
pub struct InstallationRepositories {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub owner: RepositoryOwner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

/// One item of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
}

impl ContentEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }
}

/// Error body returned by the GitHub API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}
