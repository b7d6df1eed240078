// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as threshold ranges, non-zero timeouts and Telegram completeness.

use crate::diagnostic::ConfigError;
use crate::model::HelplineConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HelplineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        fail(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.server.host.trim().is_empty() {
        fail("server.host must not be empty".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let threshold = config.matcher.threshold;
    if !(0.0..=1.0).contains(&threshold) {
        fail(format!("matcher.threshold must be within [0, 1], got {threshold}"));
    }

    if config.ai.max_tokens == 0 {
        fail("ai.max_tokens must be greater than 0".to_string());
    }
    if config.ai.timeout_secs == 0 {
        fail("ai.timeout_secs must be greater than 0".to_string());
    }
    if config.ai.base_url.trim().is_empty() {
        fail("ai.base_url must not be empty".to_string());
    }

    if config.telegram.bot_token.is_some() && config.telegram.admin_chat_id.is_none() {
        fail("telegram.admin_chat_id is required when telegram.bot_token is set".to_string());
    }
    if config.telegram.send_timeout_secs == 0 {
        fail("telegram.send_timeout_secs must be greater than 0".to_string());
    }

    if config.admin.identity.trim().is_empty() {
        fail("admin.identity must not be empty".to_string());
    }
    if config.admin.code_ttl_secs == 0 {
        fail("admin.code_ttl_secs must be greater than 0".to_string());
    }
    if config.admin.session_ttl_secs == 0 {
        fail("admin.session_ttl_secs must be greater than 0".to_string());
    }
    if config.admin.max_code_attempts == 0 {
        fail("admin.max_code_attempts must be at least 1".to_string());
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

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&HelplineConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = HelplineConfig::default();
        config.matcher.threshold = 1.5;
        config.ai.max_tokens = 0;
        config.admin.identity = " ".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn bot_token_requires_chat_id() {
        let mut config = HelplineConfig::default();
        config.telegram.bot_token = Some("123:ABC".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("admin_chat_id"));

        config.telegram.admin_chat_id = Some(42);
        assert!(validate_config(&config).is_ok());
    }
}
