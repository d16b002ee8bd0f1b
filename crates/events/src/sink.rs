//! Notification sink collaborator.
//!
//! A [`NotificationSink`] performs the actual display of a classified
//! [`NotificationRequest`]. Failures are reported back to the dispatcher,
//! which logs them and moves on.

use async_trait::async_trait;
use panel_core::{ChannelConfig, NotificationRequest};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for notification display failures.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The relay returned a non-2xx status code.
    #[error("Relay returned HTTP {0}")]
    HttpStatus(u16),

    /// The notification channel could not be created.
    #[error("Channel setup failed: {0}")]
    Channel(String),

    /// The host refused to display the notification.
    #[error("Display failed: {0}")]
    Display(String),
}

// ---------------------------------------------------------------------------
// NotificationSink
// ---------------------------------------------------------------------------

/// Displays notifications on behalf of the dispatcher.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Create or refresh the channel before showing on it.
    async fn ensure_channel(&self, _channel: &ChannelConfig) -> Result<(), SinkError> {
        Ok(())
    }

    /// Show `request` under notification id `id`.
    async fn show(&self, id: i32, request: &NotificationRequest) -> Result<(), SinkError>;
}

/// Allocate a notification id from the wall clock.
///
/// Milliseconds since the epoch, truncated to 32 bits.
pub fn next_notification_id() -> i32 {
    chrono::Utc::now().timestamp_millis() as i32
}

// ---------------------------------------------------------------------------
// LogSink
// ---------------------------------------------------------------------------

/// Sink that renders notifications as structured log events.
///
/// Used when no relay is configured. Every notification is logged with the
/// channel the sink was built for.
#[derive(Debug, Clone)]
pub struct LogSink {
    channel_id: String,
}

impl LogSink {
    pub fn new(channel: &ChannelConfig) -> Self {
        Self {
            channel_id: channel.id.clone(),
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(&ChannelConfig::default())
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn ensure_channel(&self, channel: &ChannelConfig) -> Result<(), SinkError> {
        if channel.id != self.channel_id {
            tracing::warn!(
                expected = %self.channel_id,
                requested = %channel.id,
                "Notification channel differs from the sink's channel"
            );
        }
        tracing::debug!(
            channel = %channel.id,
            name = %channel.name,
            importance = ?channel.importance,
            "Notification channel ready"
        );
        Ok(())
    }

    async fn show(&self, id: i32, request: &NotificationRequest) -> Result<(), SinkError> {
        tracing::info!(
            notification_id = id,
            channel = %self.channel_id,
            kind = %request.kind,
            title = %request.title,
            body = %request.body,
            extras = ?request.extras,
            "Notification shown"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use panel_core::{classify, MessageEvent};

    use super::*;

    #[tokio::test]
    async fn log_sink_always_succeeds() {
        let sink = LogSink::default();
        let request = classify(&MessageEvent::rendered(Some("Hi"), Some("there"))).unwrap();

        sink.ensure_channel(&ChannelConfig::default()).await.unwrap();
        sink.show(1, &request).await.unwrap();
    }

    #[test]
    fn log_sink_tracks_configured_channel() {
        let channel = ChannelConfig::default().with_id("ops").unwrap();
        assert_eq!(LogSink::new(&channel).channel_id(), "ops");
        assert_eq!(LogSink::default().channel_id(), "admin_notifications");
    }

    #[test]
    fn sink_error_display_http_status() {
        let err = SinkError::HttpStatus(502);
        assert_eq!(err.to_string(), "Relay returned HTTP 502");
    }

    #[test]
    fn sink_error_display_channel() {
        let err = SinkError::Channel("denied".to_string());
        assert_eq!(err.to_string(), "Channel setup failed: denied");
    }
}
