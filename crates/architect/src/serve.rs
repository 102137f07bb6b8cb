// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `architect serve` command implementation.
//!
//! Wires the session store, authorization gate, GitHub and Gemini clients,
//! and the workflow dispatcher into the HTTP gateway, then serves until a
//! shutdown signal arrives.

use std::sync::Arc;

use architect_config::ArchitectConfig;
use architect_core::{ArchitectError, SessionStore};
use architect_gateway::poe::SettingsResponse;
use architect_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig};
use architect_github::GitHubAppClient;
use architect_research::{GeminiClient, ResearchTaskRunner};
use architect_workflow::{
    AuthorizationGate, InMemorySessionStore, RepositoryContext, WorkflowDispatcher,
};
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the `architect serve` command.
pub async fn run_serve(config: ArchitectConfig) -> Result<(), ArchitectError> {
    init_tracing(&config.agent.log_level);

    info!(agent_name = config.agent.name.as_str(), "starting architect serve");
    for warning in readiness_warnings(&config) {
        warn!("{warning}");
    }

    let auth = poe_auth(&config)?;
    let shutdown = shutdown::install_signal_handler();
    let dispatcher = build_dispatcher(&config, shutdown.clone()).await?;

    let state = GatewayState {
        dispatcher: Arc::new(dispatcher),
        settings: Arc::new(SettingsResponse::new(config.agent.introduction_message.clone())),
        webhook_secret: non_empty(config.github.webhook_secret.as_deref()),
        auth,
        health: HealthState {
            start_time: std::time::Instant::now(),
        },
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        poe_path: config.poe.path.clone(),
    };

    log_memory_stats("startup");
    architect_gateway::start_server(&server_config, state, shutdown).await?;
    log_memory_stats("shutdown");

    info!("architect shutdown complete");
    Ok(())
}

/// Builds the Poe auth config, refusing to run without an access key unless
/// unauthenticated access was explicitly allowed.
fn poe_auth(config: &ArchitectConfig) -> Result<AuthConfig, ArchitectError> {
    let bearer_token = non_empty(config.poe.access_key.as_deref());
    if bearer_token.is_none() && !config.poe.allow_unauthenticated {
        return Err(ArchitectError::Config(
            "Poe access key not found. Set poe.access_key in config or POE_ACCESS_KEY environment variable \
             (or poe.allow_unauthenticated = true for local testing)."
                .into(),
        ));
    }
    Ok(AuthConfig {
        bearer_token,
        allow_unauthenticated: config.poe.allow_unauthenticated,
    })
}

/// Wires collaborators into a dispatcher whose research stops on `shutdown`.
async fn build_dispatcher(
    config: &ArchitectConfig,
    shutdown: CancellationToken,
) -> Result<WorkflowDispatcher, ArchitectError> {
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let gate = AuthorizationGate::from_config(store, &config.github, &config.session)?;
    info!(signed_state = gate.signs_state(), "authorization gate ready");

    let backend = Arc::new(GeminiClient::from_config(&config.gemini)?);
    info!(agent = backend.agent(), "gemini research backend ready");
    let runner = Arc::new(ResearchTaskRunner::from_config(backend, &config.gemini));

    let dispatcher = WorkflowDispatcher::new(Arc::new(gate), runner).with_shutdown(shutdown);
    Ok(match GitHubAppClient::from_config(&config.github).await? {
        Some(github) => dispatcher.with_repository(RepositoryContext {
            lister: Arc::new(github),
            file_limit: config.github.file_limit,
        }),
        None => dispatcher,
    })
}

/// Problems that do not fail validation but limit what `serve` can do.
pub fn readiness_warnings(config: &ArchitectConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if non_empty(config.poe.access_key.as_deref()).is_none() {
        if config.poe.allow_unauthenticated {
            warnings.push("poe.allow_unauthenticated is set; the Poe endpoint accepts any caller".into());
        } else {
            warnings.push("poe.access_key is not set; serve will refuse to start".into());
        }
    }
    if config.github.app_name.is_none() {
        warnings.push("github.app_name is not set; serve will refuse to start".into());
    }
    if config.github.app_id.is_none() {
        warnings.push("github.app_id is not set; research runs without repository context".into());
    }
    if config.gemini.api_key.is_none() {
        warnings.push("gemini.api_key is not set; serve will refuse to start".into());
    }
    if config.session.state_secret.is_none() {
        warnings.push("session.state_secret is not set; login state is not signed".into());
    }
    if config.gemini.max_poll_attempts == 0 {
        warnings.push("gemini.max_poll_attempts is 0; research polls without a deadline".into());
    }
    warnings
}

fn non_empty(value: Option<&str>) -> Option<SecretString> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| SecretString::from(v.to_string()))
}

#[cfg(not(target_env = "msvc"))]
fn log_memory_stats(phase: &str) {
    // Stats are cached until the epoch advances.
    let _ = tikv_jemalloc_ctl::epoch::advance();
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
    let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
    info!(phase, allocated_bytes = allocated, resident_bytes = resident, "memory stats");
}

#[cfg(target_env = "msvc")]
fn log_memory_stats(_phase: &str) {}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("architect={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> ArchitectConfig {
        architect_config::load_config_from_str(toml).unwrap()
    }

    #[test]
    fn poe_auth_fails_closed_without_key() {
        let err = poe_auth(&config("")).unwrap_err();
        assert!(matches!(err, ArchitectError::Config(msg) if msg.contains("POE_ACCESS_KEY")));
    }

    #[test]
    fn poe_auth_accepts_key_or_explicit_opt_out() {
        let keyed = poe_auth(&config("[poe]\naccess_key = \"k\"\n")).unwrap();
        assert!(keyed.bearer_token.is_some());

        let open = poe_auth(&config("[poe]\nallow_unauthenticated = true\n")).unwrap();
        assert!(open.bearer_token.is_none());
        assert!(open.allow_unauthenticated);
    }

    #[test]
    fn readiness_warnings_flag_missing_credentials() {
        let warnings = readiness_warnings(&config(""));
        assert!(warnings.iter().any(|w| w.contains("poe.access_key")));
        assert!(warnings.iter().any(|w| w.contains("github.app_name")));
        assert!(warnings.iter().any(|w| w.contains("gemini.api_key")));
    }

    #[tokio::test]
    async fn dispatcher_requires_gemini_key() {
        let cfg = config("[github]\napp_name = \"bl1nk\"\n");
        assert!(matches!(
            build_dispatcher(&cfg, CancellationToken::new()).await,
            Err(ArchitectError::Config(_))
        ));
    }

    #[tokio::test]
    async fn dispatcher_builds_without_github_credentials() {
        let cfg = config("[github]\napp_name = \"bl1nk\"\n\n[gemini]\napi_key = \"g\"\n");
        assert!(build_dispatcher(&cfg, CancellationToken::new()).await.is_ok());
    }
}
