//! Relay sink that forwards notifications to an HTTP endpoint.
//!
//! [`WebhookSink`] POSTs each [`NotificationRequest`] as JSON to a relay URL
//! (for example a companion service that pushes to a desktop or chat
//! channel). Failed attempts are retried with backoff (1 s, 2 s, 4 s by
//! default) followed by one final attempt.

use std::time::Duration;

use async_trait::async_trait;
use panel_core::{ChannelConfig, NotificationRequest};

use crate::sink::{NotificationSink, SinkError};

/// Default retry delays (exponential backoff: 1s, 2s, 4s).
const DEFAULT_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Forwards notifications to a relay endpoint over HTTP.
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
    channel_id: String,
    retry_delays: Vec<Duration>,
}

impl WebhookSink {
    /// Create a sink posting to `url`, tagging every payload with the channel.
    pub fn new(url: impl Into<String>, channel: &ChannelConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            channel_id: channel.id.clone(),
            retry_delays: DEFAULT_RETRY_DELAYS.to_vec(),
        })
    }

    /// Replace the backoff schedule. An empty schedule means a single attempt.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    fn payload(&self, id: i32, request: &NotificationRequest) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "channel": self.channel_id,
            "kind": request.kind,
            "title": request.title,
            "body": request.body,
            "extras": request.extras,
        })
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), SinkError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(SinkError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn show(&self, id: i32, request: &NotificationRequest) -> Result<(), SinkError> {
        let payload = self.payload(id, request);

        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            match self.try_send(&payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url = %self.url,
                        notification_id = id,
                        error = %e,
                        "Relay delivery attempt failed, retrying"
                    );
                    tokio::time::sleep(*delay).await;
                }
            }
        }

        // Final attempt after the last backoff.
        self.try_send(&payload).await.map_err(|e| {
            tracing::error!(
                url = %self.url,
                notification_id = id,
                error = %e,
                "Relay delivery failed after all retries"
            );
            e
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
