// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session store.

use architect_core::{InstallationId, SessionStore, UserId};
use async_trait::async_trait;
use dashmap::DashMap;

/// Process-local [`SessionStore`] backed by a sharded concurrent map.
///
/// Records are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<UserId, InstallationId>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user: &UserId) -> Option<InstallationId> {
        self.sessions.get(user).map(|entry| entry.value().clone())
    }

    async fn set(&self, user: &UserId, installation: InstallationId) {
        self.sessions.insert(user.clone(), installation);
    }

    async fn exists(&self, user: &UserId) -> bool {
        self.sessions.contains_key(user)
    }
}
