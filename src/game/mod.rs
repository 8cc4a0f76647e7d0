//! Game side of the relay.
//!
//! This module contains:
//! - Template rendering with placeholder substitution
//! - The host runtime boundary and the console stand-in host

pub mod formatter;
pub mod host;

pub use host::{ConsoleHost, GameHost};
