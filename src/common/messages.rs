//! Canonical message types for relay communication.
//!
//! `OutboundEvent` is what the game side hands the forwarder,
//! `RemoteMessage` is what the Discord API hands the poller.

use serde::Deserialize;

/// Kind of game event being relayed to Discord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A player typed in chat.
    Chat,
    /// A message originated by the server itself (plugins, console).
    ServerMessage,
    /// A player finished connecting.
    Join,
    /// A player disconnected.
    Leave,
}

/// Game event to be relayed to Discord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEvent {
    /// Player (or server) display name.
    pub display_name: String,
    /// Chat text, or the disconnect reason for `Leave`.
    pub text: String,
    pub kind: EventKind,
}

impl OutboundEvent {
    pub fn chat(display_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            text: message.into(),
            kind: EventKind::Chat,
        }
    }

    pub fn server_message(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            display_name: name.into(),
            text: message.into(),
            kind: EventKind::ServerMessage,
        }
    }

    pub fn join(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            text: String::new(),
            kind: EventKind::Join,
        }
    }

    pub fn leave(display_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            text: reason.into(),
            kind: EventKind::Leave,
        }
    }
}

/// Message author as reported by Discord.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteAuthor {
    pub username: String,
    /// Set for bot accounts, including this relay's own.
    #[serde(default)]
    pub bot: bool,
}

/// A channel message returned by `GET /channels/{id}/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteMessage {
    /// Snowflake id, newest-first in list responses.
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub author: RemoteAuthor,
}
