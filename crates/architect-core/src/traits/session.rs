// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait mapping chat users to GitHub App installations.

use async_trait::async_trait;

use crate::types::{InstallationId, UserId};

/// Storage for authorization records.
///
/// At most one record exists per user. Implementations must make `set`
/// atomic per key; no ordering is required across different users.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the installation authorized by `user`, if any.
    async fn get(&self, user: &UserId) -> Option<InstallationId>;

    /// Stores `installation` for `user`, replacing any previous record.
    async fn set(&self, user: &UserId, installation: InstallationId);

    /// Returns true when `user` has an authorization record.
    async fn exists(&self, user: &UserId) -> bool {
        self.get(user).await.is_some()
    }
}
