// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository file listing for an authorized installation.

use async_trait::async_trait;

use crate::error::ArchitectError;
use crate::types::InstallationId;

/// Lists file paths of the repository reachable through an installation.
#[async_trait]
pub trait RepositoryLister: Send + Sync + 'static {
    /// Returns up to `limit` file paths in breadth-first order.
    ///
    /// Token exchange and API failures are returned as errors; they are not
    /// swallowed at this layer.
    async fn list_files(
        &self,
        installation: &InstallationId,
        limit: usize,
    ) -> Result<Vec<String>, ArchitectError>;
}
