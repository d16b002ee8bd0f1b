//! In-process inbound event bus backed by a `tokio::sync::broadcast` channel.
//!
//! The inbound adapter publishes every delivered push message and token
//! rotation as an [`InboundEvent`]; the [`MessageRouter`](crate::MessageRouter)
//! subscribes and dispatches them.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use panel_core::MessageEvent;

// ---------------------------------------------------------------------------
// InboundEvent
// ---------------------------------------------------------------------------

/// Something the push provider delivered to this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A push message, rendered and/or data-only.
    Message(MessageEvent),
    /// The provider rotated the device token.
    TokenRefresh { token: String },
}

impl InboundEvent {
    /// Short label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            InboundEvent::Message(_) => "message",
            InboundEvent::TokenRefresh { .. } => "token_refresh",
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus for [`InboundEvent`]s.
///
/// Share via `Arc<EventBus>` between the inbound adapter and routers.
pub struct EventBus {
    sender: broadcast::Sender<InboundEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unconsumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers that will see it. With no
    /// subscribers the event is dropped.
    pub fn publish(&self, event: InboundEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(event = event.label(), "No subscribers, inbound event dropped");
                0
            }
        }
    }

    /// Subscribe to all events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<InboundEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
