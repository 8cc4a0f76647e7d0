//! Discord -> game polling.
//!
//! Each cycle asks Discord for the messages newer than the cursor and
//! broadcasts them in game, oldest first. The first cycle after start only
//! records the newest message id so the channel history is not replayed.
//!
//! The cursor lock is held for the whole cycle, request included. A tick
//! that finds the previous cycle still waiting on Discord is skipped rather
//! than queued, so two cycles never read the same cursor.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bridge::state::RelayState;
use crate::common::RemoteMessage;
use crate::discord::{translate_emojis, DiscordClient, MessageQuery};
use crate::game::formatter::{FormatContext, MessageFormatter};
use crate::game::GameHost;

/// Result of a single poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// First cycle: cursor set to the newest message, nothing broadcast.
    Bootstrapped,
    /// Discord returned no messages; cursor unchanged.
    Empty,
    /// New messages were processed and the cursor advanced.
    Relayed { received: usize, broadcast: usize },
    /// Request or decode failed; cursor unchanged.
    Failed,
    /// The previous cycle still holds the cursor; this tick was skipped.
    Busy,
}

#[derive(Clone)]
pub struct Poller {
    state: Arc<RelayState>,
    client: DiscordClient,
    host: Arc<dyn GameHost>,
}

impl Poller {
    pub fn new(state: Arc<RelayState>, client: DiscordClient, host: Arc<dyn GameHost>) -> Self {
        Self {
            state,
            client,
            host,
        }
    }

    /// Run one poll cycle.
    pub async fn poll_once(&self) -> PollOutcome {
        let Ok(mut cursor) = self.state.cursor().try_lock() else {
            return PollOutcome::Busy;
        };

        let query = match cursor.token() {
            None => {
                info!("Initializing last message...");
                MessageQuery::Latest
            }
            Some(id) => MessageQuery::After(id.to_string()),
        };

        let messages = match self.client.fetch_messages(&query).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!("GET: {}", e);
                return PollOutcome::Failed;
            }
        };

        // Newest first.
        let Some(newest) = messages.first() else {
            return PollOutcome::Empty;
        };

        let previous = (*cursor).clone();
        if !cursor.advance(&newest.id) {
            warn!(
                cursor = ?previous.token(),
                newest = %newest.id,
                "Discord returned no message newer than the cursor, ignoring response"
            );
            return PollOutcome::Empty;
        }
        debug!("Cursor advanced to {}", newest.id);

        if query == MessageQuery::Latest {
            return PollOutcome::Bootstrapped;
        }

        let mut broadcast = 0;
        if self.state.config.relay.send_discord_to_game {
            for message in messages.iter().rev() {
                if previous.is_behind(&message.id) && self.relay_to_game(message) {
                    broadcast += 1;
                }
            }
        }

        PollOutcome::Relayed {
            received: messages.len(),
            broadcast,
        }
    }

    /// Broadcast one Discord message in game. Returns whether it was sent.
    fn relay_to_game(&self, message: &RemoteMessage) -> bool {
        // Includes our own posts echoed back by Discord.
        if message.author.bot {
            return false;
        }

        let ctx = FormatContext::discord_user(
            &message.author.username,
            translate_emojis(&message.content),
        );
        let text = MessageFormatter::new(&self.state.lang.discord_to_game_chat).format(&ctx);

        info!("{}", text);
        self.host.broadcast(&text);
        true
    }

    /// Poll on the configured interval until `cancel` fires.
    ///
    /// Every tick runs its cycle as a separate task so a slow request never
    /// delays the schedule. Cycles still running at cancellation are aborted.
    pub fn spawn(self, cancel: CancellationToken, runtime: &Handle) -> JoinHandle<()> {
        runtime.spawn(async move {
            let period = self.state.config.relay.poll_interval();
            info!("Polling Discord every {:.1}s", period.as_secs_f64());

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut cycles = JoinSet::new();

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let poller = self.clone();
                        cycles.spawn(async move {
                            let outcome = poller.poll_once().await;
                            debug!(?outcome, "Poll cycle finished");
                        });
                    }
                    Some(result) = cycles.join_next(), if !cycles.is_empty() => {
                        if let Err(e) = result {
                            warn!("Poll cycle failed: {}", e);
                        }
                    }
                }
            }

            cycles.shutdown().await;
            info!("Discord polling stopped");
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use mockito::{Matcher, Server};
    use serde_json::json;

    use crate::bridge::state::Cursor;
    use crate::config::{Config, Lang};

    /// Host that records every broadcast.
    #[derive(Default)]
    pub(crate) struct RecordingHost {
        pub lines: Mutex<Vec<String>>,
    }

    impl RecordingHost {
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl GameHost for RecordingHost {
        fn broadcast(&self, text: &str) {
            self.lines.lock().unwrap().push(text.to_string());
        }
    }

    fn make_poller(
        server: &Server,
        config_fn: impl FnOnce(&mut Config),
    ) -> (Poller, Arc<RelayState>, Arc<RecordingHost>) {
        let mut config = Config::default();
        config.discord.token = "secret".to_string();
        config.discord.channel_id = "42".to_string();
        config.discord.api_base_url = server.url();
        config.discord.request_timeout_secs = 2.0;
        config_fn(&mut config);

        let client = DiscordClient::new(&config.discord).unwrap();
        let state = Arc::new(RelayState::new(config, Lang::default()));
        let host = Arc::new(RecordingHost::default());
        let poller = Poller::new(state.clone(), client, host.clone());
        (poller, state, host)
    }

    fn message(id: &str, username: &str, content: &str, bot: bool) -> serde_json::Value {
        json!({"id": id, "content": content, "author": {"username": username, "bot": bot}})
    }

    async fn set_cursor(state: &RelayState, id: &str) {
        *state.cursor().lock().await = Cursor::Set(id.to_string());
    }

    async fn mock_after(server: &mut Server, after: &str, status: usize, body: String) -> mockito::Mock {
        server
            .mock("GET", "/channels/42/messages")
            .match_query(Matcher::UrlEncoded("after".into(), after.into()))
            .match_header("authorization", "Bot secret")
            .with_status(status)
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_bootstrap_sets_cursor_without_broadcast() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/channels/42/messages")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(200)
            .with_body(json!([message("900", "alice", "old news", false)]).to_string())
            .create_async()
            .await;

        let (poller, state, host) = make_poller(&server, |_| {});
        assert_eq!(poller.poll_once().await, PollOutcome::Bootstrapped);

        mock.assert_async().await;
        assert_eq!(state.current_cursor().await, Cursor::Set("900".to_string()));
        assert!(host.lines().is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_on_empty_channel_stays_uninitialized() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/channels/42/messages")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let (poller, state, _host) = make_poller(&server, |_| {});
        assert_eq!(poller.poll_once().await, PollOutcome::Empty);
        assert_eq!(state.current_cursor().await, Cursor::Uninitialized);
    }

    #[tokio::test]
    async fn test_broadcasts_oldest_first() {
        let mut server = Server::new_async().await;
        let body = json!([
            message("3", "carol", "third", false),
            message("2", "bob", "second", false),
            message("1", "alice", "first", false),
        ]);
        let _mock = mock_after(&mut server, "0", 200, body.to_string()).await;

        let (poller, state, host) = make_poller(&server, |_| {});
        set_cursor(&state, "0").await;

        assert_eq!(
            poller.poll_once().await,
            PollOutcome::Relayed { received: 3, broadcast: 3 }
        );
        assert_eq!(
            host.lines(),
            vec!["[D] alice: first", "[D] bob: second", "[D] carol: third"]
        );
        assert_eq!(state.current_cursor().await, Cursor::Set("3".to_string()));
    }

    #[tokio::test]
    async fn test_bot_messages_advance_cursor_but_are_not_broadcast() {
        let mut server = Server::new_async().await;
        let body = json!([
            message("5", "herald", "**[Bob]** hello", true),
            message("4", "alice", "hi 😄", false),
        ]);
        let _mock = mock_after(&mut server, "3", 200, body.to_string()).await;

        let (poller, state, host) = make_poller(&server, |_| {});
        set_cursor(&state, "3").await;

        assert_eq!(
            poller.poll_once().await,
            PollOutcome::Relayed { received: 2, broadcast: 1 }
        );
        assert_eq!(host.lines(), vec!["[D] alice: hi :D"]);
        assert_eq!(state.current_cursor().await, Cursor::Set("5".to_string()));
    }

    #[tokio::test]
    async fn test_inbound_disabled_still_advances_cursor() {
        let mut server = Server::new_async().await;
        let body = json!([message("8", "alice", "anyone on?", false)]);
        let _mock = mock_after(&mut server, "7", 200, body.to_string()).await;

        let (poller, state, host) = make_poller(&server, |config| {
            config.relay.send_discord_to_game = false;
        });
        set_cursor(&state, "7").await;

        assert_eq!(
            poller.poll_once().await,
            PollOutcome::Relayed { received: 1, broadcast: 0 }
        );
        assert!(host.lines().is_empty());
        assert_eq!(state.current_cursor().await, Cursor::Set("8".to_string()));
    }

    #[tokio::test]
    async fn test_error_and_empty_leave_cursor_alone() {
        let mut server = Server::new_async().await;
        let (poller, state, host) = make_poller(&server, |_| {});
        set_cursor(&state, "10").await;

        let failing = mock_after(&mut server, "10", 503, "unavailable".to_string()).await;
        assert_eq!(poller.poll_once().await, PollOutcome::Failed);
        assert_eq!(state.current_cursor().await, Cursor::Set("10".to_string()));
        failing.remove_async().await;

        let malformed = mock_after(&mut server, "10", 200, "{\"not\": \"a list\"}".to_string()).await;
        assert_eq!(poller.poll_once().await, PollOutcome::Failed);
        assert_eq!(state.current_cursor().await, Cursor::Set("10".to_string()));
        malformed.remove_async().await;

        let _empty = mock_after(&mut server, "10", 200, "[]".to_string()).await;
        assert_eq!(poller.poll_once().await, PollOutcome::Empty);
        assert_eq!(state.current_cursor().await, Cursor::Set("10".to_string()));
        assert!(host.lines().is_empty());
    }

    #[tokio::test]
    async fn test_stale_response_is_ignored() {
        let mut server = Server::new_async().await;
        let body = json!([message("9", "alice", "replayed", false)]);
        let _mock = mock_after(&mut server, "10", 200, body.to_string()).await;

        let (poller, state, host) = make_poller(&server, |_| {});
        set_cursor(&state, "10").await;

        assert_eq!(poller.poll_once().await, PollOutcome::Empty);
        assert_eq!(state.current_cursor().await, Cursor::Set("10".to_string()));
        assert!(host.lines().is_empty());
    }

    #[tokio::test]
    async fn test_cursor_is_monotonic_across_cycles() {
        let mut server = Server::new_async().await;
        let (poller, state, _host) = make_poller(&server, |_| {});
        set_cursor(&state, "100").await;

        let first = mock_after(
            &mut server,
            "100",
            200,
            json!([message("120", "a", "x", false), message("110", "b", "y", false)]).to_string(),
        )
        .await;
        poller.poll_once().await;
        first.remove_async().await;
        assert_eq!(state.current_cursor().await, Cursor::Set("120".to_string()));

        let second = mock_after(&mut server, "120", 500, String::new()).await;
        poller.poll_once().await;
        second.remove_async().await;
        assert_eq!(state.current_cursor().await, Cursor::Set("120".to_string()));

        let _third = mock_after(
            &mut server,
            "120",
            200,
            json!([message("1000", "a", "z", false)]).to_string(),
        )
        .await;
        poller.poll_once().await;
        assert_eq!(state.current_cursor().await, Cursor::Set("1000".to_string()));
    }

    #[tokio::test]
    async fn test_hung_server_times_out() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let mut config = Config::default();
        config.discord.token = "secret".to_string();
        config.discord.channel_id = "42".to_string();
        config.discord.api_base_url = format!("http://{}", addr);
        config.discord.request_timeout_secs = 0.2;

        let client = DiscordClient::new(&config.discord).unwrap();
        let state = Arc::new(RelayState::new(config, Lang::default()));
        let host = Arc::new(RecordingHost::default());
        let poller = Poller::new(state.clone(), client, host.clone());
        set_cursor(&state, "10").await;

        let outcome = tokio::time::timeout(Duration::from_secs(1), poller.poll_once())
            .await
            .expect("request was not bounded by the timeout");
        assert_eq!(outcome, PollOutcome::Failed);
        assert_eq!(state.current_cursor().await, Cursor::Set("10".to_string()));

        let next = tokio::time::timeout(Duration::from_secs(1), poller.poll_once())
            .await
            .expect("second cycle hung");
        assert_eq!(next, PollOutcome::Failed);
        assert!(host.lines().is_empty());

        hold.abort();
    }

    #[tokio::test]
    async fn test_overlapping_cycle_is_skipped() {
        let server = Server::new_async().await;
        let (poller, state, _host) = make_poller(&server, |_| {});

        let _guard = state.cursor().lock().await;
        assert_eq!(poller.poll_once().await, PollOutcome::Busy);
    }

    #[tokio::test]
    async fn test_spawned_poller_stops_on_cancel() {
        let mut server = Server::new_async().await;
        let bootstrap = server
            .mock("GET", "/channels/42/messages")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(200)
            .with_body(json!([message("55", "alice", "hi", false)]).to_string())
            .create_async()
            .await;

        let (poller, state, _host) = make_poller(&server, |config| {
            config.relay.check_discord_interval = 0.1;
        });
        let cancel = CancellationToken::new();
        let task = poller.spawn(cancel.clone(), &Handle::current());

        // The first tick fires immediately.
        for _ in 0..50 {
            if state.current_cursor().await != Cursor::Uninitialized {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        bootstrap.assert_async().await;
        assert_eq!(state.current_cursor().await, Cursor::Set("55".to_string()));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("poller did not stop")
            .unwrap();
    }
}
