// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed repository lister.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use architect_core::{ArchitectError, InstallationId, RepositoryLister};

/// A repository lister that returns fixed paths, or a fixed error.
///
/// `limit` is honoured so callers can check truncation.
pub struct StaticRepositoryLister {
    files: Result<Vec<String>, String>,
    calls: Arc<Mutex<Vec<InstallationId>>>,
}

impl StaticRepositoryLister {
    pub fn with_files(files: &[&str]) -> Self {
        Self {
            files: Ok(files.iter().map(|f| f.to_string()).collect()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Lister whose every call fails with a GitHub error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            files: Err(message.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Installations that were listed, oldest first.
    pub async fn calls(&self) -> Vec<InstallationId> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl RepositoryLister for StaticRepositoryLister {
    async fn list_files(
        &self,
        installation: &InstallationId,
        limit: usize,
    ) -> Result<Vec<String>, ArchitectError> {
        self.calls.lock().await.push(installation.clone());
        match &self.files {
            Ok(files) => Ok(files.iter().take(limit).cloned().collect()),
            Err(message) => Err(ArchitectError::github(message.clone())),
        }
    }
}
