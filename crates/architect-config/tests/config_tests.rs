// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use architect_config::diagnostic::ConfigError;
use architect_config::model::ArchitectConfig;
use architect_config::{load_and_validate_str, load_config_from_str};

#[test]
fn valid_toml_deserializes_into_architect_config() {
    let toml = r#"
[agent]
name = "architect-test"
log_level = "debug"

[gateway]
host = "0.0.0.0"
port = 9090

[poe]
access_key = "poe-key"
path = "/bot"

[github]
app_id = 12345
app_name = "bl1nk-architect"
file_limit = 50
webhook_secret = "whsec"

[gemini]
api_key = "g-key"
poll_interval_secs = 2
max_poll_attempts = 10

[session]
state_secret = "0123456789abcdef0123"
state_ttl_secs = 120
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "architect-test");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 9090);
    assert_eq!(config.poe.access_key.as_deref(), Some("poe-key"));
    assert_eq!(config.poe.path, "/bot");
    assert_eq!(config.github.app_id, Some(12345));
    assert_eq!(config.github.app_name.as_deref(), Some("bl1nk-architect"));
    assert_eq!(config.github.file_limit, 50);
    assert_eq!(config.github.webhook_secret.as_deref(), Some("whsec"));
    assert_eq!(config.gemini.api_key.as_deref(), Some("g-key"));
    assert_eq!(config.gemini.poll_interval_secs, 2);
    assert_eq!(config.gemini.max_poll_attempts, 10);
    assert_eq!(config.session.state_ttl_secs, 120);
}

#[test]
fn defaults_match_reference_behavior() {
    let config = ArchitectConfig::default();
    assert_eq!(config.gemini.poll_interval_secs, 5);
    assert_eq!(config.gemini.agent, "deep-research-pro-preview-12-2025");
    assert_eq!(config.github.file_limit, 100);
    assert_eq!(config.github.web_base_url, "https://github.com");
    assert_eq!(config.poe.path, "/poe");
    assert!(!config.poe.allow_unauthenticated);
    assert!(config.session.state_secret.is_none());
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("empty config should be valid");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.agent.name, "bl1nk-architect");
}

#[test]
fn unknown_field_in_github_produces_suggestion() {
    let toml = r#"
[github]
aap_id = 1
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("should produce an UnknownKey error");
    assert_eq!(unknown.0, "aap_id");
    assert_eq!(unknown.1.as_deref(), Some("app_id"));
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telegram]
bot_token = "abc"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn wrong_type_produces_invalid_type_error() {
    let toml = r#"
[gateway]
port = "not-a-number"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

#[test]
fn semantic_validation_runs_after_parse() {
    let toml = r#"
[session]
state_secret = "tiny"
"#;
    let errors = load_and_validate_str(toml).expect_err("short secret should fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("state_secret"))));
}

#[test]
fn explicit_config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("architect.toml");
    std::fs::write(
        &path,
        r#"
[gateway]
port = 9191

[github]
file_limit = 25
"#,
    )
    .unwrap();

    let config = architect_config::load_and_validate_path(&path).expect("file should load");
    assert_eq!(config.gateway.port, 9191);
    assert_eq!(config.github.file_limit, 25);
}

#[test]
fn explicit_config_file_typo_gets_suggestion() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("architect.toml");
    std::fs::write(&path, "[gemini]\npoll_interval_sec = 3\n").unwrap();

    let errors = architect_config::load_and_validate_path(&path).expect_err("typo should fail");
    assert!(
        errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "poll_interval_secs"
        )),
        "got: {errors:?}"
    );
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");

    let errors = architect_config::load_and_validate_path(&path).expect_err("missing file");
    assert_eq!(errors.len(), 1);
    assert!(
        matches!(&errors[0], ConfigError::FileNotFound { path: p } if p.ends_with("nope.toml")),
        "got: {errors:?}"
    );
}

#[test]
fn directory_is_not_a_config_file() {
    let dir = tempfile::tempdir().unwrap();

    let errors = architect_config::load_and_validate_path(dir.path()).expect_err("directory");
    assert!(matches!(&errors[0], ConfigError::FileNotFound { .. }));
}
