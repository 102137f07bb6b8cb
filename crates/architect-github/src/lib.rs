// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GitHub App collaborator.
//!
//! [`GitHubAppClient`] authenticates as a GitHub App, exchanges an
//! installation id for an access token, and lists the files of the
//! installation's first repository. It implements [`RepositoryLister`] so
//! the workflow can fold the listing into the research prompt.

pub mod client;
pub mod types;

use architect_config::model::GitHubConfig;
use architect_core::{ArchitectError, InstallationId, RepositoryLister};
use async_trait::async_trait;
use secrecy::SecretString;
use tracing::info;

pub use client::{GitHubAppClient, NO_REPOSITORIES};

impl GitHubAppClient {
    /// Builds a client from configuration.
    ///
    /// Returns `Ok(None)` when no app credentials are configured at all, and
    /// an error when they are only partially configured.
    ///
    /// Private key resolution: `private_key_path` (read from disk) > `private_key`.
    pub async fn from_config(config: &GitHubConfig) -> Result<Option<Self>, ArchitectError> {
        let private_key = match (&config.private_key_path, &config.private_key) {
            (Some(path), _) => Some(tokio::fs::read_to_string(path).await.map_err(|e| {
                ArchitectError::Config(format!(
                    "failed to read GitHub private key from {path}: {e}"
                ))
            })?),
            (None, Some(inline)) => Some(inline.replace("\\n", "\n")),
            (None, None) => None,
        };

        match (config.app_id, private_key) {
            (None, None) => Ok(None),
            (Some(app_id), Some(pem)) => {
                let client =
                    Self::new(app_id, &SecretString::from(pem), config.api_base_url.clone())?;
                info!(app_id, "GitHub App client initialized");
                Ok(Some(client))
            }
            (None, Some(_)) => Err(ArchitectError::Config(
                "github.private_key is set but github.app_id is missing".into(),
            )),
            (Some(_), None) => Err(ArchitectError::Config(
                "github.app_id is set but no github.private_key or github.private_key_path"
                    .into(),
            )),
        }
    }
}

#[async_trait]
impl RepositoryLister for GitHubAppClient {
    async fn list_files(
        &self,
        installation: &InstallationId,
        limit: usize,
    ) -> Result<Vec<String>, ArchitectError> {
        let token = self.installation_access_token(installation).await?;
        self.list_repository_files(&token, limit).await
    }
}
