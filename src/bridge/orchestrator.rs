//! Relay orchestrator that ties the game and Discord together.
//!
//! Owns the shared state, hands out the forwarder to host callbacks and
//! runs the poller until shutdown.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::bridge::forwarder::Forwarder;
use crate::bridge::poller::Poller;
use crate::bridge::state::RelayState;
use crate::common::RelayResult;
use crate::config::{Config, Lang};
use crate::discord::DiscordClient;
use crate::game::GameHost;

/// A running relay.
///
/// The poll timer lives until [`Relay::shutdown`] is called or the relay
/// is dropped, whichever comes first.
pub struct Relay {
    state: Arc<RelayState>,
    forwarder: Forwarder,
    cancel: CancellationToken,
    poller_task: Option<JoinHandle<()>>,
}

impl Relay {
    /// Build the relay and start polling if Discord -> game is enabled.
    pub fn start(
        config: Config,
        lang: Lang,
        host: Arc<dyn GameHost>,
        runtime: Handle,
    ) -> RelayResult<Self> {
        let client = DiscordClient::new(&config.discord)?;
        let state = Arc::new(RelayState::new(config, lang));
        let relay = &state.config.relay;

        info!(
            game_to_discord = relay.send_game_to_discord,
            discord_to_game = relay.send_discord_to_game,
            announce_join = relay.announce_join,
            announce_leave = relay.announce_leave,
            "Starting relay for channel {}",
            state.config.discord.channel_id
        );

        let cancel = CancellationToken::new();
        let poller_task = if relay.send_discord_to_game {
            let poller = Poller::new(state.clone(), client.clone(), host);
            Some(poller.spawn(cancel.clone(), &runtime))
        } else {
            info!("Discord -> game relay disabled, not polling");
            None
        };

        let forwarder = Forwarder::new(state.clone(), client, runtime);

        Ok(Self {
            state,
            forwarder,
            cancel,
            poller_task,
        })
    }

    /// Forwarder for host event callbacks.
    pub fn forwarder(&self) -> Forwarder {
        self.forwarder.clone()
    }

    /// Stop the poll timer and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();

        if let Some(task) = self.poller_task.take() {
            if let Err(e) = task.await {
                warn!("Poller task ended abnormally: {}", e);
            }
        }

        info!(
            cursor = ?self.state.current_cursor().await,
            "Relay stopped"
        );
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
