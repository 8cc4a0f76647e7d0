//! Discord REST integration.
//!
//! This module provides the HTTP client used by both relay directions
//! and the text transforms applied to Discord content.

pub mod client;
pub mod emoji;

// Re-export main types for external use
pub use client::{DiscordClient, MessageQuery};
pub use emoji::translate_emojis;
