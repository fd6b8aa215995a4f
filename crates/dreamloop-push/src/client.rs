//! HTTP client for the Expo push service.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::PushError;
use crate::message::PushMessage;

/// Expo rejects requests carrying more than this many messages.
pub const MAX_MESSAGES_PER_REQUEST: usize = 100;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Per-message delivery receipt returned by Expo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushTicket {
    pub status: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PushTicket {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Deserialize)]
struct SendResponse {
    #[serde(default)]
    data: Vec<PushTicket>,
}

pub struct ExpoPushClient {
    client: Client,
    push_url: String,
    access_token: Option<String>,
}

impl ExpoPushClient {
    /// Creates a client that posts message batches to `push_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        push_url: &str,
        access_token: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, PushError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            push_url: push_url.to_owned(),
            access_token: access_token.map(str::to_owned),
        })
    }

    /// Sends one batch of messages in a single request.
    ///
    /// Tickets come back in message order. A ticket with status `error`
    /// is logged here but does not fail the batch.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::BatchTooLarge`] before any I/O when `messages`
    /// exceeds [`MAX_MESSAGES_PER_REQUEST`], and [`PushError`] for transport
    /// failures, non-2xx replies, or an unreadable response body.
    pub async fn send_batch(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }
        if messages.len() > MAX_MESSAGES_PER_REQUEST {
            return Err(PushError::BatchTooLarge {
                size: messages.len(),
                limit: MAX_MESSAGES_PER_REQUEST,
            });
        }

        let mut request = self
            .client
            .post(&self.push_url)
            .header("accept", "application/json")
            .json(messages);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PushError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: SendResponse =
            serde_json::from_str(&body).map_err(|e| PushError::Deserialize {
                context: "expo push tickets".to_string(),
                source: e,
            })?;

        for ticket in parsed.data.iter().filter(|t| !t.is_ok()) {
            tracing::warn!(
                status = %ticket.status,
                message = ticket.message.as_deref().unwrap_or(""),
                "push: expo rejected message"
            );
        }

        Ok(parsed.data)
    }
}
