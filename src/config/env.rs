//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `HERALD_DISCORD_TOKEN` - Discord bot token
//! - `HERALD_CHANNEL_ID` - Discord channel to relay
//! - `HERALD_API_BASE_URL` - Discord REST endpoint

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "HERALD";

/// Apply environment variable overrides to a config.
///
/// This allows the bot token to be provided via the environment
/// instead of the config file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(token) = env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)) {
        config.discord.token = token;
    }
    if let Ok(channel_id) = env::var(format!("{}_CHANNEL_ID", ENV_PREFIX)) {
        config.discord.channel_id = channel_id;
    }
    if let Ok(url) = env::var(format!("{}_API_BASE_URL", ENV_PREFIX)) {
        config.discord.api_base_url = url;
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `HERALD_CONFIG`, otherwise returns "herald.json".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "herald.json".to_string())
}

/// Get the language file path from environment or use default.
///
/// Checks `HERALD_LANG`, otherwise returns "herald.lang.json".
pub fn get_lang_path() -> String {
    env::var(format!("{}_LANG", ENV_PREFIX)).unwrap_or_else(|_| "herald.lang.json".to_string())
}
