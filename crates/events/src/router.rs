//! Inbound event routing loop.
//!
//! [`MessageRouter`] hands each [`InboundEvent`] to the shared
//! [`MessageDispatcher`]. It is fed either by an [`EventBus`](crate::EventBus)
//! subscription ([`run`](MessageRouter::run), lossy when a subscriber lags)
//! or by a bounded `mpsc` queue ([`run_queue`](MessageRouter::run_queue),
//! where producers wait for the router). It runs as a long-lived background
//! task and stops when its source closes or the cancellation token fires.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::bus::InboundEvent;
use crate::dispatcher::MessageDispatcher;

/// Background service feeding inbound events to a dispatcher.
pub struct MessageRouter {
    dispatcher: Arc<MessageDispatcher>,
}

impl MessageRouter {
    pub fn new(dispatcher: Arc<MessageDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Run the routing loop until the bus closes or `cancel` fires.
    ///
    /// Returns the number of events handled.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<InboundEvent>,
        cancel: CancellationToken,
    ) -> u64 {
        let mut handled = 0;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(handled, "Message router cancelled");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => {
                        self.route(event).await;
                        handled += 1;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Message router lagged, events were dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(handled, "Event bus closed, message router shutting down");
                        break;
                    }
                },
            }
        }
        handled
    }

    /// Run the routing loop over a bounded queue until every sender is
    /// dropped or `cancel` fires.
    ///
    /// Events already queued when the senders drop are still handled.
    /// Returns the number of events handled.
    pub async fn run_queue(
        self,
        mut receiver: mpsc::Receiver<InboundEvent>,
        cancel: CancellationToken,
    ) -> u64 {
        let mut handled = 0;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(handled, "Message router cancelled");
                    break;
                }
                received = receiver.recv() => match received {
                    Some(event) => {
                        self.route(event).await;
                        handled += 1;
                    }
                    None => {
                        tracing::info!(
                            handled,
                            "Inbound queue closed, message router shutting down"
                        );
                        break;
                    }
                },
            }
        }
        handled
    }

    async fn route(&self, event: InboundEvent) {
        match event {
            InboundEvent::Message(message) => {
                let outcome = self.dispatcher.on_message_received(&message).await;
                tracing::debug!(?outcome, "Message processing complete");
            }
            InboundEvent::TokenRefresh { token } => {
                self.dispatcher.on_new_token(&token).await;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use panel_core::MessageEvent;

    use super::*;
    use crate::bus::EventBus;
    use crate::sink::LogSink;
    use crate::token_store::{MemoryTokenStore, TokenStore};

    #[tokio::test]
    async fn routes_until_bus_closes() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let dispatcher = Arc::new(MessageDispatcher::new(
            Arc::new(LogSink::default()),
            tokens.clone(),
        ));

        let bus = EventBus::default();
        let receiver = bus.subscribe();

        bus.publish(InboundEvent::Message(MessageEvent::data([("foo", "bar")])));
        bus.publish(InboundEvent::TokenRefresh {
            token: "fresh".to_string(),
        });
        drop(bus);

        let handled = MessageRouter::new(dispatcher)
            .run(receiver, CancellationToken::new())
            .await;

        assert_eq!(handled, 2);
        assert_eq!(tokens.load().await.unwrap().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn stops_on_cancel() {
        let dispatcher = Arc::new(MessageDispatcher::new(
            Arc::new(LogSink::default()),
            Arc::new(MemoryTokenStore::new()),
        ));
        let bus = EventBus::default();
        let cancel = CancellationToken::new();

        let task =
            tokio::spawn(MessageRouter::new(dispatcher).run(bus.subscribe(), cancel.clone()));
        cancel.cancel();

        assert_eq!(task.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn queue_handles_more_events_than_its_capacity() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let dispatcher = Arc::new(MessageDispatcher::new(
            Arc::new(LogSink::default()),
            tokens.clone(),
        ));
        let (queue, inbox) = mpsc::channel(8);

        let router = tokio::spawn(
            MessageRouter::new(dispatcher).run_queue(inbox, CancellationToken::new()),
        );

        for n in 0..100 {
            queue
                .send(InboundEvent::TokenRefresh {
                    token: format!("token-{n}"),
                })
                .await
                .unwrap();
        }
        drop(queue);

        assert_eq!(router.await.unwrap(), 100);
        assert_eq!(tokens.load().await.unwrap().as_deref(), Some("token-99"));
    }
}
