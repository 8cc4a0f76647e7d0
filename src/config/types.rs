//! Configuration type definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Discord REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v10";

/// Default seconds between polls of the Discord channel.
pub const DEFAULT_CHECK_INTERVAL: f64 = 5.0;

/// Shortest poll interval the relay will schedule.
pub const MIN_CHECK_INTERVAL: f64 = 1.0;

/// Default per-request timeout for Discord API calls.
pub const DEFAULT_REQUEST_TIMEOUT: f64 = 10.0;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub discord: DiscordConfig,
    pub relay: RelayConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token, with or without the `Bot ` prefix.
    pub token: String,
    /// Channel the relay posts to and polls.
    pub channel_id: String,
    pub api_base_url: String,
    pub request_timeout_secs: f64,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            channel_id: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl DiscordConfig {
    /// Request timeout, falling back to the default for unusable values.
    pub fn request_timeout(&self) -> Duration {
        let secs = self.request_timeout_secs;
        if secs > 0.0 {
            if let Ok(timeout) = Duration::try_from_secs_f64(secs) {
                return timeout;
            }
        }
        Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT)
    }
}

/// Feature toggles and polling cadence.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    pub send_game_to_discord: bool,
    pub send_discord_to_game: bool,
    pub announce_join: bool,
    pub announce_leave: bool,
    /// Seconds between polls. Values below one second are clamped.
    pub check_discord_interval: f64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            send_game_to_discord: true,
            send_discord_to_game: true,
            announce_join: true,
            announce_leave: true,
            check_discord_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

impl RelayConfig {
    /// Poll interval with the one second floor applied.
    pub fn poll_interval(&self) -> Duration {
        let floor = Duration::from_secs_f64(MIN_CHECK_INTERVAL);
        Duration::try_from_secs_f64(self.check_discord_interval)
            .map_or(floor, |interval| interval.max(floor))
    }
}
