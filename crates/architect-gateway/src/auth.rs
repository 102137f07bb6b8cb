// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for the gateway.
//!
//! - Poe requests carry `Authorization: Bearer <access_key>`.
//! - GitHub webhooks carry `X-Hub-Signature-256: sha256=<hex hmac>`.
//!
//! When no access key is configured, Poe requests are rejected (fail-closed)
//! unless unauthenticated access was explicitly allowed.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Authentication configuration for the Poe endpoint.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token. If `Some`, bearer auth is enforced.
    pub bearer_token: Option<SecretString>,
    /// Accept requests when no bearer token is configured.
    pub allow_unauthenticated: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field("allow_unauthenticated", &self.allow_unauthenticated)
            .finish()
    }
}

/// Middleware that validates the Poe bearer token.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = auth.bearer_token.as_ref() else {
        if auth.allow_unauthenticated {
            return Ok(next.run(request).await);
        }
        tracing::error!("poe endpoint has no access key configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected.expose_secret() => Ok(next.run(request).await),
        _ => {
            tracing::debug!("poe request rejected: bad or missing bearer token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Verifies a GitHub `X-Hub-Signature-256` header over `payload`.
pub fn verify_webhook_signature(secret: &SecretString, payload: &[u8], signature: &str) -> bool {
    let sig = signature.strip_prefix("sha256=").unwrap_or(signature);
    let Ok(sig_bytes) = hex::decode(sig) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&sig_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn auth_config_debug_redacts_token() {
        let config = AuthConfig {
            bearer_token: Some(SecretString::from("secret-token".to_string())),
            allow_unauthenticated: false,
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("secret-token"));
        assert!(debug_output.contains("[redacted]"));
    }

    #[test]
    fn webhook_signature_accepts_valid() {
        let secret = SecretString::from("hook-secret".to_string());
        let body = br#"{"action":"created"}"#;
        assert!(verify_webhook_signature(&secret, body, &sign("hook-secret", body)));
    }

    #[test]
    fn webhook_signature_rejects_wrong_secret_or_body() {
        let secret = SecretString::from("hook-secret".to_string());
        let body = br#"{"action":"created"}"#;
        assert!(!verify_webhook_signature(&secret, body, &sign("other", body)));
        assert!(!verify_webhook_signature(&secret, b"tampered", &sign("hook-secret", body)));
        assert!(!verify_webhook_signature(&secret, body, "sha256=not-hex"));
    }
}
