//! Common utilities and types shared across the application.

pub mod error;
pub mod messages;

pub use error::{RelayError, RelayResult};
pub use messages::{EventKind, OutboundEvent, RemoteMessage};
