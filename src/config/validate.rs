//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Validate Discord config
    if config.discord.token.trim().is_empty() {
        errors.push("discord.token is required".to_string());
    }
    let channel_id = config.discord.channel_id.trim();
    if channel_id.is_empty() {
        errors.push("discord.channel_id is required".to_string());
    } else if !channel_id.chars().all(|c| c.is_ascii_digit()) {
        errors.push(format!(
            "discord.channel_id must be a numeric channel ID (got '{}')",
            channel_id
        ));
    }
    if config.discord.api_base_url.trim().is_empty() {
        errors.push("discord.api_base_url is required".to_string());
    }
    let timeout = config.discord.request_timeout_secs;
    if !timeout.is_finite() || timeout <= 0.0 {
        errors.push(format!(
            "discord.request_timeout_secs must be positive (got {})",
            timeout
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
