// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::ArchitectConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &ArchitectConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if !config.poe.path.starts_with('/') {
        fail(format!(
            "poe.path must start with `/`, got `{}`",
            config.poe.path
        ));
    }

    for (key, url) in [
        ("github.api_base_url", &config.github.api_base_url),
        ("github.web_base_url", &config.github.web_base_url),
        ("gemini.base_url", &config.gemini.base_url),
    ] {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            fail(format!("{key} must be an http(s) URL, got `{url}`"));
        }
    }

    if config.github.file_limit == 0 {
        fail("github.file_limit must be at least 1".to_string());
    }

    if config.gemini.poll_interval_secs == 0 {
        fail("gemini.poll_interval_secs must be at least 1".to_string());
    }

    if config.gemini.request_timeout_secs == 0 {
        fail("gemini.request_timeout_secs must be at least 1".to_string());
    }

    if let Some(secret) = &config.session.state_secret {
        if secret.len() < 16 {
            fail(format!(
                "session.state_secret must be at least 16 bytes, got {}",
                secret.len()
            ));
        }
    }

    if config.session.state_ttl_secs == 0 {
        fail("session.state_ttl_secs must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ArchitectConfig::default()).is_ok());
    }

    #[test]
    fn empty_host_fails_validation() {
        let mut config = ArchitectConfig::default();
        config.gateway.host = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "gateway.host"));
    }

    #[test]
    fn relative_poe_path_fails_validation() {
        let mut config = ArchitectConfig::default();
        config.poe.path = "poe".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "poe.path"));
    }

    #[test]
    fn zero_limits_are_all_reported() {
        let mut config = ArchitectConfig::default();
        config.github.file_limit = 0;
        config.gemini.poll_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_error(&errors, "file_limit"));
        assert!(has_error(&errors, "poll_interval_secs"));
    }

    #[test]
    fn short_state_secret_fails_validation() {
        let mut config = ArchitectConfig::default();
        config.session.state_secret = Some("short".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "state_secret"));
    }

    #[test]
    fn sixteen_byte_state_secret_is_accepted() {
        let mut config = ArchitectConfig::default();
        config.session.state_secret = Some("0123456789abcdef".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let mut config = ArchitectConfig::default();
        config.gemini.base_url = "ftp://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "gemini.base_url"));
    }

    #[test]
    fn unbounded_polling_is_allowed() {
        let mut config = ArchitectConfig::default();
        config.gemini.max_poll_attempts = 0;
        assert!(validate_config(&config).is_ok());
    }
}
