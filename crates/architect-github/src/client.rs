// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the GitHub App REST API.
//!
//! Authenticates as the app with a short-lived RS256 JWT, exchanges it for
//! an installation access token, and walks repository contents.

use std::collections::VecDeque;
use std::time::Duration;

use architect_core::{ArchitectError, InstallationId};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::types::{
    AccessTokenResponse, ApiErrorResponse, AppClaims, ContentEntry, InstallationRepositories,
};

/// Placeholder returned when an installation grants no repositories.
pub const NO_REPOSITORIES: &str = "No repositories found.";

/// Backdate applied to `iat` to tolerate clock drift with GitHub.
const JWT_BACKDATE_SECS: i64 = 60;

/// JWT lifetime; GitHub rejects anything above ten minutes.
const JWT_LIFETIME_SECS: i64 = 600;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub App client holding the app identity and a pooled HTTP client.
pub struct GitHubAppClient {
    client: reqwest::Client,
    app_id: u64,
    encoding_key: EncodingKey,
    api_base_url: String,
}

impl std::fmt::Debug for GitHubAppClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAppClient")
            .field("app_id", &self.app_id)
            .field("encoding_key", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl GitHubAppClient {
    /// Creates a client for `app_id` signing with the PEM `private_key`.
    pub fn new(
        app_id: u64,
        private_key: &SecretString,
        api_base_url: impl Into<String>,
    ) -> Result<Self, ArchitectError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key.expose_secret().as_bytes())
            .map_err(|e| ArchitectError::Config(format!("invalid GitHub App private key: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("bl1nk-architect/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ArchitectError::GitHub {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            app_id,
            encoding_key,
            api_base_url: api_base_url.into(),
        })
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// Signs a JWT authenticating as the app itself.
    pub fn app_jwt(&self) -> Result<String, ArchitectError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AppClaims {
            iat: now - JWT_BACKDATE_SECS,
            exp: now + JWT_LIFETIME_SECS,
            iss: self.app_id.to_string(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key).map_err(
            |e| ArchitectError::GitHub {
                message: format!("failed to sign app JWT: {e}"),
                source: Some(Box::new(e)),
            },
        )
    }

    /// Exchanges the app JWT for an access token scoped to `installation`.
    pub async fn installation_access_token(
        &self,
        installation: &InstallationId,
    ) -> Result<SecretString, ArchitectError> {
        let jwt = self.app_jwt()?;
        let url = self.endpoint(&[
            "app",
            "installations",
            installation.as_str(),
            "access_tokens",
        ])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(jwt)
            .send()
            .await
            .map_err(request_failed)?;
        let body: AccessTokenResponse = read_json(response).await?;

        info!(
            installation = installation.as_str(),
            expires_at = body.expires_at.as_deref().unwrap_or("unknown"),
            "installation access token issued"
        );
        Ok(SecretString::from(body.token))
    }

    /// Lists up to `limit` file paths of the installation's first repository.
    ///
    /// Directories are expanded breadth-first: each directory's entries are
    /// appended to the back of a FIFO queue, and the walk stops as soon as
    /// `limit` paths have been collected.
    pub async fn list_repository_files(
        &self,
        token: &SecretString,
        limit: usize,
    ) -> Result<Vec<String>, ArchitectError> {
        let url = self.endpoint(&["installation", "repositories"])?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(request_failed)?;
        let repos: InstallationRepositories = read_json(response).await?;

        let Some(repo) = repos.repositories.into_iter().next() else {
            info!("installation has no repositories");
            return Ok(vec![NO_REPOSITORIES.to_string()]);
        };
        debug!(
            repository = repo.full_name.as_str(),
            total = repos.total_count,
            "listing files of first repository"
        );

        let mut files = Vec::new();
        let mut queue: VecDeque<ContentEntry> = self
            .contents(token, &repo.owner.login, &repo.name, "")
            .await?
            .into();

        while let Some(entry) = queue.pop_front() {
            if entry.is_dir() {
                queue.extend(
                    self.contents(token, &repo.owner.login, &repo.name, &entry.path)
                        .await?,
                );
            } else {
                files.push(entry.path);
            }
            if files.len() >= limit {
                break;
            }
        }

        info!(
            repository = repo.full_name.as_str(),
            count = files.len(),
            "repository files listed"
        );
        Ok(files)
    }

    async fn contents(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<ContentEntry>, ArchitectError> {
        let mut segments = vec!["repos", owner, repo, "contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let url = self.endpoint(&segments)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(request_failed)?;
        read_json(response).await
    }

    /// Joins `segments` onto the API base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ArchitectError> {
        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            ArchitectError::Config(format!(
                "invalid GitHub API base URL `{}`: {e}",
                self.api_base_url
            ))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ArchitectError::Config(format!(
                    "GitHub API base URL `{}` cannot be a base",
                    self.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn request_failed(e: reqwest::Error) -> ArchitectError {
    if e.is_timeout() {
        return ArchitectError::Timeout {
            duration: REQUEST_TIMEOUT,
        };
    }
    ArchitectError::GitHub {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Decodes a successful JSON body, or turns an error status into `ArchitectError::GitHub`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ArchitectError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| ArchitectError::GitHub {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;

    if !status.is_success() {
        return Err(ArchitectError::github(describe_failure(status, &body)));
    }

    serde_json::from_str(&body).map_err(|e| ArchitectError::GitHub {
        message: format!("failed to parse GitHub response: {e}"),
        source: Some(Box::new(e)),
    })
}

fn describe_failure(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!("GitHub API returned {status}: {}", api_err.message),
        Err(_) => format!("GitHub API returned {status}: {body}"),
    }
}
