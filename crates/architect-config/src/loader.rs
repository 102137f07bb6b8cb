// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./architect.toml` > `~/.config/architect/architect.toml`
//! > `/etc/architect/architect.toml`, then conventional provider variables
//! (`GOOGLE_API_KEY`, `GITHUB_APP_ID`, ...), then `ARCHITECT_*` overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ArchitectConfig;

/// Top-level sections, used to map `ARCHITECT_<SECTION>_<KEY>` onto `section.key`.
const SECTIONS: &[&str] = &["agent", "gateway", "poe", "github", "gemini", "session"];

/// Environment variables the hosted bot has always been configured with.
const CONVENTIONAL_VARS: &[(&str, &str)] = &[
    ("google_api_key", "gemini.api_key"),
    ("github_app_id", "github.app_id"),
    ("github_app_name", "github.app_name"),
    ("github_private_key", "github.private_key"),
    ("poe_access_key", "poe.access_key"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/architect/architect.toml`
/// 3. `~/.config/architect/architect.toml`
/// 4. `./architect.toml`
/// 5. Conventional variables (`GOOGLE_API_KEY`, `GITHUB_*`, `POE_ACCESS_KEY`)
/// 6. `ARCHITECT_*` environment variables
pub fn load_config() -> Result<ArchitectConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<ArchitectConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ArchitectConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ArchitectConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ArchitectConfig::default()))
        .merge(Toml::file(path))
        .merge(conventional_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the XDG lookup, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ArchitectConfig::default()))
        .merge(Toml::file("/etc/architect/architect.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("architect/architect.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("architect.toml"))
        .merge(conventional_env_provider())
        .merge(env_provider())
}

/// Maps a prefix-stripped, lowercased variable name onto its dotted key.
///
/// Only the first underscore is treated as the section separator, so
/// `github_private_key_path` becomes `github.private_key_path`.
pub fn section_key(key: &str) -> String {
    match key.split_once('_') {
        Some((section, rest)) if SECTIONS.contains(&section) => format!("{section}.{rest}"),
        _ => key.to_string(),
    }
}

fn env_provider() -> Env {
    Env::prefixed("ARCHITECT_").map(|key| section_key(key.as_str()).into())
}

fn conventional_env_provider() -> Env {
    let names: Vec<&str> = CONVENTIONAL_VARS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let lowered = key.as_str().to_ascii_lowercase();
        CONVENTIONAL_VARS
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, dotted)| (*dotted).to_string())
            .unwrap_or(lowered)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_key_splits_on_first_underscore() {
        assert_eq!(section_key("github_private_key_path"), "github.private_key_path");
        assert_eq!(section_key("gemini_poll_interval_secs"), "gemini.poll_interval_secs");
        assert_eq!(section_key("agent_log_level"), "agent.log_level");
    }

    #[test]
    fn section_key_leaves_unknown_sections_alone() {
        assert_eq!(section_key("unknown_key"), "unknown_key");
        assert_eq!(section_key("plain"), "plain");
    }

    #[test]
    fn architect_prefixed_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("architect.toml", "[gateway]\nport = 9000\n")?;
            jail.set_env("ARCHITECT_GATEWAY_PORT", "9100");
            jail.set_env("ARCHITECT_GITHUB_FILE_LIMIT", "25");

            let config = load_config_from_path(Path::new("architect.toml"))?;
            assert_eq!(config.gateway.port, 9100);
            assert_eq!(config.github.file_limit, 25);
            Ok(())
        });
    }

    #[test]
    fn conventional_env_vars_fill_credentials() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("architect.toml", "")?;
            jail.set_env("GOOGLE_API_KEY", "g-key");
            jail.set_env("GITHUB_APP_ID", "4242");
            jail.set_env("GITHUB_APP_NAME", "bl1nk-architect");
            jail.set_env("POE_ACCESS_KEY", "poe-secret");

            let config = load_config_from_path(Path::new("architect.toml"))?;
            assert_eq!(config.gemini.api_key.as_deref(), Some("g-key"));
            assert_eq!(config.github.app_id, Some(4242));
            assert_eq!(config.github.app_name.as_deref(), Some("bl1nk-architect"));
            assert_eq!(config.poe.access_key.as_deref(), Some("poe-secret"));
            Ok(())
        });
    }

    #[test]
    fn architect_prefix_wins_over_conventional_vars() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("architect.toml", "")?;
            jail.set_env("GOOGLE_API_KEY", "conventional");
            jail.set_env("ARCHITECT_GEMINI_API_KEY", "explicit");

            let config = load_config_from_path(Path::new("architect.toml"))?;
            assert_eq!(config.gemini.api_key.as_deref(), Some("explicit"));
            Ok(())
        });
    }
}
