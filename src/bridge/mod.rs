//! Relay core coordinating game <-> Discord message flow.
//!
//! ## Module Structure
//!
//! - `forwarder`: Game -> Discord (`Forwarder`)
//! - `orchestrator`: Relay lifecycle (`Relay`)
//! - `poller`: Discord -> game (`Poller`)
//! - `state`: Shared relay state (`RelayState`, `Cursor`)

pub mod forwarder;
pub mod orchestrator;
pub mod poller;
pub mod state;

// Re-export the entry point
pub use orchestrator::Relay;
