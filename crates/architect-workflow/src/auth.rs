// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GitHub App authorization gate.
//!
//! Users authorize by installing the GitHub App. The install link carries a
//! `state` parameter that GitHub echoes back on the callback, which is how
//! the returned installation id is tied to a chat user.
//!
//! Two state formats are supported:
//! - plain: the user id itself
//! - signed: `{user}.{issued_at}.{hmac}` where `hmac` is hex HMAC-SHA256 of
//!   `{user}.{issued_at}` under `session.state_secret`, valid for
//!   `session.state_ttl_secs`

use std::sync::Arc;

use architect_config::model::{GitHubConfig, SessionConfig};
use architect_core::{ArchitectError, InstallationId, SessionStore, UserId};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::{debug, info, warn};

type HmacSha256 = Hmac<Sha256>;

/// Clock skew tolerated for states issued slightly in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Signs and verifies callback state.
struct StateSigner {
    secret: SecretString,
    ttl_secs: i64,
}

impl StateSigner {
    fn mac(&self, payload: &str) -> Result<HmacSha256, ArchitectError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| ArchitectError::Internal(format!("invalid state secret: {e}")))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    fn sign(&self, user: &UserId, issued_at: i64) -> Result<String, ArchitectError> {
        let payload = format!("{user}.{issued_at}");
        let tag = hex::encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{tag}"))
    }

    fn verify(&self, state: &str, now: i64) -> Result<UserId, ArchitectError> {
        let malformed = || ArchitectError::Authorization("malformed state".into());

        // The user id may itself contain dots; the last two fields are fixed.
        let mut parts = state.rsplitn(3, '.');
        let tag = parts.next().ok_or_else(malformed)?;
        let issued_at = parts.next().ok_or_else(malformed)?;
        let user = parts.next().filter(|u| !u.is_empty()).ok_or_else(malformed)?;
        let issued_at_secs: i64 = issued_at.parse().map_err(|_| malformed())?;
        let tag = hex::decode(tag).map_err(|_| malformed())?;

        self.mac(&format!("{user}.{issued_at}"))?
            .verify_slice(&tag)
            .map_err(|_| ArchitectError::Authorization("state signature mismatch".into()))?;

        if issued_at_secs > now + MAX_CLOCK_SKEW_SECS {
            return Err(ArchitectError::Authorization("state issued in the future".into()));
        }
        if now - issued_at_secs > self.ttl_secs {
            return Err(ArchitectError::Authorization("state expired".into()));
        }
        Ok(UserId::from(user))
    }
}

/// Decides whether a user may run research, and records new authorizations.
pub struct AuthorizationGate {
    store: Arc<dyn SessionStore>,
    install_url: String,
    signer: Option<StateSigner>,
}

impl AuthorizationGate {
    /// Creates a gate that issues plain (unsigned) states.
    ///
    /// `install_url` is the app's installation page, e.g.
    /// `https://github.com/apps/my-app/installations/new`.
    pub fn new(store: Arc<dyn SessionStore>, install_url: impl Into<String>) -> Self {
        Self {
            store,
            install_url: install_url.into(),
            signer: None,
        }
    }

    /// Switches to signed states with the given secret and lifetime.
    pub fn with_signed_state(mut self, secret: SecretString, ttl_secs: u64) -> Self {
        self.signer = Some(StateSigner {
            secret,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        });
        self
    }

    /// Builds the gate from the `[github]` and `[session]` sections.
    pub fn from_config(
        store: Arc<dyn SessionStore>,
        github: &GitHubConfig,
        session: &SessionConfig,
    ) -> Result<Self, ArchitectError> {
        let app_name = github
            .app_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ArchitectError::Config(
                    "GitHub App name not found. Set github.app_name in config or GITHUB_APP_NAME environment variable.".into(),
                )
            })?;
        let install_url = format!(
            "{}/apps/{app_name}/installations/new",
            github.web_base_url.trim_end_matches('/')
        );

        let gate = Self::new(store, install_url);
        Ok(match session.state_secret.as_deref() {
            Some(secret) if !secret.is_empty() => {
                gate.with_signed_state(SecretString::from(secret.to_string()), session.state_ttl_secs)
            }
            _ => gate,
        })
    }

    pub fn signs_state(&self) -> bool {
        self.signer.is_some()
    }

    pub async fn is_authorized(&self, user: &UserId) -> bool {
        self.store.exists(user).await
    }

    pub async fn installation(&self, user: &UserId) -> Option<InstallationId> {
        self.store.get(user).await
    }

    /// Returns the installation link for `user`.
    pub fn build_login_url(&self, user: &UserId) -> Result<String, ArchitectError> {
        self.build_login_url_at(user, chrono::Utc::now().timestamp())
    }

    fn build_login_url_at(&self, user: &UserId, now: i64) -> Result<String, ArchitectError> {
        let state = match &self.signer {
            Some(signer) => signer.sign(user, now)?,
            None => user.to_string(),
        };
        let url = reqwest::Url::parse_with_params(&self.install_url, &[("state", state)])
            .map_err(|e| ArchitectError::Config(format!("invalid GitHub App install URL: {e}")))?;
        Ok(url.into())
    }

    /// Records the installation returned by GitHub for the user named in `state`.
    ///
    /// Nothing is written when the state is rejected.
    pub async fn handle_callback(
        &self,
        state: &str,
        installation: InstallationId,
    ) -> Result<UserId, ArchitectError> {
        self.handle_callback_at(state, installation, chrono::Utc::now().timestamp())
            .await
    }

    async fn handle_callback_at(
        &self,
        state: &str,
        installation: InstallationId,
        now: i64,
    ) -> Result<UserId, ArchitectError> {
        if installation.as_str().is_empty() {
            return Err(ArchitectError::Authorization("empty installation id".into()));
        }
        let user = match &self.signer {
            Some(signer) => signer.verify(state, now).inspect_err(|e| {
                warn!(error = %e, "rejected login callback");
            })?,
            None if state.is_empty() => {
                return Err(ArchitectError::Authorization("empty state".into()));
            }
            None => UserId::from(state),
        };

        debug!(user = user.as_str(), "storing installation");
        self.store.set(&user, installation).await;
        info!(user = user.as_str(), "github app authorized");
        Ok(user)
    }
}
