//! Game -> Discord forwarding.
//!
//! Host callbacks call [`Forwarder::forward`] directly. It renders the
//! event, hands the POST to the runtime and returns without waiting, so it
//! is safe to call from the host's own (non-async) threads. Delivery is
//! best effort: a failed POST is logged and dropped.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::bridge::state::RelayState;
use crate::common::{EventKind, OutboundEvent};
use crate::discord::DiscordClient;
use crate::game::formatter::{FormatContext, MessageFormatter};

#[derive(Debug, Clone)]
pub struct Forwarder {
    state: Arc<RelayState>,
    client: DiscordClient,
    runtime: Handle,
}

impl Forwarder {
    pub fn new(state: Arc<RelayState>, client: DiscordClient, runtime: Handle) -> Self {
        Self {
            state,
            client,
            runtime,
        }
    }

    /// Relay a game event to Discord without blocking the caller.
    pub fn forward(&self, event: OutboundEvent) {
        self.dispatch(event);
    }

    /// Render the Discord text for an event.
    ///
    /// Returns `None` when the toggle for the event's kind is off.
    pub fn render(&self, event: &OutboundEvent) -> Option<String> {
        let relay = &self.state.config.relay;
        let lang = &self.state.lang;

        let (enabled, template, ctx) = match event.kind {
            EventKind::Chat | EventKind::ServerMessage => (
                relay.send_game_to_discord,
                &lang.game_to_discord_chat,
                FormatContext::player(&event.display_name, &event.text),
            ),
            EventKind::Join => (
                relay.announce_join,
                &lang.player_join_game,
                FormatContext::player(&event.display_name, ""),
            ),
            EventKind::Leave => (
                relay.announce_leave,
                &lang.player_leave_game,
                FormatContext::player(&event.display_name, "").with_reason(&event.text),
            ),
        };

        enabled.then(|| MessageFormatter::new(template).format(&ctx))
    }

    /// Render and spawn the POST. The handle is only for tests;
    /// `forward` drops it.
    fn dispatch(&self, event: OutboundEvent) -> Option<JoinHandle<()>> {
        let text = self.render(&event)?;
        info!("Game -> Discord: {}", text);

        let client = self.client.clone();
        Some(self.runtime.spawn(async move {
            if let Err(e) = client.send_message(&text).await {
                warn!("POST: {}", e);
            }
        }))
    }
}
