//! Discord REST client.
//!
//! The relay talks to Discord over two endpoints only:
//! - `POST /channels/{id}/messages` to post a line
//! - `GET /channels/{id}/messages?limit=1|after=<id>` to poll
//!
//! Anything other than `200 OK` is reported as [`RelayError::Status`]
//! and left to the caller to log.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::common::{RelayError, RelayResult, RemoteMessage};
use crate::config::types::DiscordConfig;

/// Authorization scheme Discord expects for bot tokens.
const BOT_SCHEME: &str = "Bot ";

/// Upper bound on establishing a connection, within the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Which messages to ask for when polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageQuery {
    /// Only the most recent message (`?limit=1`).
    Latest,
    /// Every message newer than the given id (`?after=<id>`).
    After(String),
}

impl MessageQuery {
    fn params(&self) -> [(&'static str, &str); 1] {
        match self {
            Self::Latest => [("limit", "1")],
            Self::After(id) => [("after", id.as_str())],
        }
    }
}

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Build the `Authorization` header value, adding the `Bot ` scheme
/// unless the configured token already carries it.
pub fn authorization_header(token: &str) -> String {
    if token.starts_with(BOT_SCHEME) {
        token.to_string()
    } else {
        format!("{}{}", BOT_SCHEME, token)
    }
}

/// Client for one Discord channel. Clones share the connection pool.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    messages_url: String,
    authorization: String,
}

impl DiscordClient {
    /// Create a client from configuration.
    ///
    /// Every request is bounded by `request_timeout_secs` so a hung API
    /// cannot hold a poll cycle open indefinitely.
    pub fn new(config: &DiscordConfig) -> RelayResult<Self> {
        let timeout = config.request_timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .user_agent(concat!("herald/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            messages_url: format!(
                "{}/channels/{}/messages",
                config.api_base_url.trim_end_matches('/'),
                config.channel_id.trim()
            ),
            authorization: authorization_header(&config.token),
        })
    }

    /// Post `content` to the channel.
    pub async fn send_message(&self, content: &str) -> RelayResult<()> {
        let request = self
            .http
            .post(&self.messages_url)
            .json(&CreateMessage { content });

        self.execute(request).await.map(|_| ())
    }

    /// Fetch channel messages, newest first.
    pub async fn fetch_messages(&self, query: &MessageQuery) -> RelayResult<Vec<RemoteMessage>> {
        let request = self.http.get(&self.messages_url).query(&query.params()[..]);

        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send an authorized request and return the body of a `200 OK`.
    async fn execute(&self, request: RequestBuilder) -> RelayResult<String> {
        let response = request
            .header(AUTHORIZATION, &self.authorization)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(retry_after) = response.headers().get(RETRY_AFTER) {
                debug!("Discord rate limit hit, retry-after {:?}", retry_after);
            }
        }

        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(RelayError::Status { status, body });
        }

        Ok(body)
    }
}
