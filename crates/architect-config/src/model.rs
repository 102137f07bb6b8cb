// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArchitectConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Poe server-bot protocol settings.
    #[serde(default)]
    pub poe: PoeConfig,

    /// GitHub App credentials and repository listing.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Gemini deep-research backend settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Login handshake settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Greeting shown by the chat platform before the first message.
    #[serde(default = "default_introduction_message")]
    pub introduction_message: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            introduction_message: default_introduction_message(),
        }
    }
}

fn default_agent_name() -> String {
    "bl1nk-architect".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_introduction_message() -> String {
    "Hello! I am **Bl1nk Architect**. Please login to GitHub to start auditing your codebase."
        .to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Poe server-bot configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoeConfig {
    /// Access key Poe sends as a bearer token. Falls back to `POE_ACCESS_KEY`.
    #[serde(default)]
    pub access_key: Option<String>,

    /// Route the bot protocol is served on.
    #[serde(default = "default_poe_path")]
    pub path: String,

    /// Serve the bot route without an access key (local development only).
    #[serde(default)]
    pub allow_unauthenticated: bool,
}

impl Default for PoeConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            path: default_poe_path(),
            allow_unauthenticated: false,
        }
    }
}

fn default_poe_path() -> String {
    "/poe".to_string()
}

/// GitHub App configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GitHubConfig {
    /// Numeric GitHub App id. Falls back to `GITHUB_APP_ID`.
    #[serde(default)]
    pub app_id: Option<u64>,

    /// App slug used in the installation URL. Falls back to `GITHUB_APP_NAME`.
    #[serde(default)]
    pub app_name: Option<String>,

    /// PEM-encoded RSA private key. Falls back to `GITHUB_PRIVATE_KEY`.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Path to the PEM private key. Takes precedence over `private_key`.
    #[serde(default)]
    pub private_key_path: Option<String>,

    /// REST API base URL.
    #[serde(default = "default_github_api_base_url")]
    pub api_base_url: String,

    /// Web base URL used for the installation redirect.
    #[serde(default = "default_github_web_base_url")]
    pub web_base_url: String,

    /// Maximum number of file paths listed per repository.
    #[serde(default = "default_file_limit")]
    pub file_limit: usize,

    /// Secret for verifying `X-Hub-Signature-256` on webhook deliveries.
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_name: None,
            private_key: None,
            private_key_path: None,
            api_base_url: default_github_api_base_url(),
            web_base_url: default_github_web_base_url(),
            file_limit: default_file_limit(),
            webhook_secret: None,
        }
    }
}

fn default_github_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_web_base_url() -> String {
    "https://github.com".to_string()
}

fn default_file_limit() -> usize {
    100
}

/// Gemini deep-research configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Google API key. Falls back to `GOOGLE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Research agent identifier.
    #[serde(default = "default_gemini_agent")]
    pub agent: String,

    /// API base URL (without the `/interactions` suffix).
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Delay between status polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Maximum number of polls before giving up. `0` polls forever.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Timeout for each individual HTTP request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            agent: default_gemini_agent(),
            base_url: default_gemini_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            max_poll_attempts: default_max_poll_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_gemini_agent() -> String {
    "deep-research-pro-preview-12-2025".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_poll_attempts() -> u32 {
    // One hour at the default interval.
    720
}

fn default_request_timeout_secs() -> u64 {
    60
}

/// Login handshake configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// HMAC key for signing the install-redirect `state`. `None` echoes the
    /// bare user id.
    #[serde(default)]
    pub state_secret: Option<String>,

    /// Lifetime of a signed `state` value.
    #[serde(default = "default_state_ttl_secs")]
    pub state_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_secret: None,
            state_ttl_secs: default_state_ttl_secs(),
        }
    }
}

fn default_state_ttl_secs() -> u64 {
    600
}
