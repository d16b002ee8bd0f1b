//! Message dispatcher: classification plus hand-off to collaborators.
//!
//! [`MessageDispatcher`] is the boundary around the pure classifier. It owns
//! no state besides its injected [`NotificationSink`] and [`TokenStore`], and
//! every collaborator failure is logged and contained within the call that
//! triggered it.

use std::sync::Arc;

use panel_core::{classify, ChannelConfig, MessageEvent, NotificationKind};

use crate::sink::{next_notification_id, NotificationSink};
use crate::token_store::TokenStore;

/// What happened to a single inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// A notification was handed to the sink and shown.
    Shown { id: i32, kind: NotificationKind },
    /// The message had neither rendered text nor data.
    Empty,
    /// Classification succeeded but the sink failed to show it.
    SinkFailed { kind: NotificationKind },
}

/// Routes inbound messages and token rotations to their collaborators.
pub struct MessageDispatcher {
    sink: Arc<dyn NotificationSink>,
    tokens: Arc<dyn TokenStore>,
    channel: ChannelConfig,
}

impl MessageDispatcher {
    /// Create a dispatcher on the default admin channel.
    pub fn new(sink: Arc<dyn NotificationSink>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            sink,
            tokens,
            channel: ChannelConfig::default(),
        }
    }

    /// Use `channel` for every notification shown by this dispatcher.
    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }

    pub fn channel(&self) -> &ChannelConfig {
        &self.channel
    }

    /// Classify `event` and, if it yields a notification, show it.
    ///
    /// Never fails: sink errors are logged and reported as
    /// [`MessageOutcome::SinkFailed`].
    pub async fn on_message_received(&self, event: &MessageEvent) -> MessageOutcome {
        tracing::debug!(
            from = event.from.as_deref().unwrap_or("-"),
            message_id = event.message_id.as_deref().unwrap_or("-"),
            rendered = event.is_rendered(),
            data_keys = event.data.len(),
            message_type = event.message_type().unwrap_or("-"),
            "Message received"
        );

        let Some(request) = classify(event) else {
            tracing::warn!(
                message_id = event.message_id.as_deref().unwrap_or("-"),
                "Empty message received"
            );
            return MessageOutcome::Empty;
        };

        // A missing channel should not stop the notification itself.
        if let Err(e) = self.sink.ensure_channel(&self.channel).await {
            tracing::error!(
                error = %e,
                channel = %self.channel.id,
                "Failed to create notification channel"
            );
        }

        let id = next_notification_id();
        match self.sink.show(id, &request).await {
            Ok(()) => {
                tracing::debug!(
                    notification_id = id,
                    kind = %request.kind,
                    title = %request.title,
                    "Notification handed to sink"
                );
                MessageOutcome::Shown {
                    id,
                    kind: request.kind,
                }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    kind = %request.kind,
                    message_id = event.message_id.as_deref().unwrap_or("-"),
                    "Error showing notification"
                );
                MessageOutcome::SinkFailed { kind: request.kind }
            }
        }
    }

    /// Persist a rotated device token.
    ///
    /// Returns whether the save succeeded; failures are logged, never raised.
    pub async fn on_new_token(&self, token: &str) -> bool {
        tracing::info!(token_len = token.len(), "New device token received");
        match self.tokens.save(token).await {
            Ok(()) => {
                tracing::debug!("Device token saved");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Error saving device token");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
