//! Localized message templates.
//!
//! Placeholders: `{displayName}`, `{message}`, `{username}`, `{reason}`.
//! Templates are plain data; rendering lives in `game::formatter`.

use serde::{Deserialize, Serialize};

/// Template for game chat sent to Discord.
pub const DEFAULT_GAME_TO_DISCORD_CHAT: &str = "**[{displayName}]** {message}";

/// Template for Discord chat broadcast in game.
pub const DEFAULT_DISCORD_TO_GAME_CHAT: &str = "[D] {username}: {message}";

/// Template for join announcements.
pub const DEFAULT_PLAYER_JOIN_GAME: &str = "**{displayName}** has joined the server!";

/// Template for leave announcements.
pub const DEFAULT_PLAYER_LEAVE_GAME: &str =
    "**{displayName}** has left the server! Reason: {reason}";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Lang {
    pub game_to_discord_chat: String,
    pub discord_to_game_chat: String,
    pub player_join_game: String,
    pub player_leave_game: String,
}

impl Default for Lang {
    fn default() -> Self {
        Self {
            game_to_discord_chat: DEFAULT_GAME_TO_DISCORD_CHAT.to_string(),
            discord_to_game_chat: DEFAULT_DISCORD_TO_GAME_CHAT.to_string(),
            player_join_game: DEFAULT_PLAYER_JOIN_GAME.to_string(),
            player_leave_game: DEFAULT_PLAYER_LEAVE_GAME.to_string(),
        }
    }
}
