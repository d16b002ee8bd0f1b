//! Inbound push event handling.
//!
//! This crate wires the pure classifier from `panel-core` to the outside
//! world:
//!
//! - [`EventBus`] — in-process fan-out of [`InboundEvent`]s from the push
//!   provider adapter.
//! - [`MessageDispatcher`] — classifies messages, shows notifications and
//!   stores rotated tokens, containing every collaborator failure.
//! - [`MessageRouter`] — background loop feeding the bus into a dispatcher.
//! - [`NotificationSink`] / [`TokenStore`] — collaborator traits, with
//!   [`LogSink`], [`WebhookSink`], [`MemoryTokenStore`] and
//!   [`FileTokenStore`] implementations.
//! - [`NotifierConfig`] — environment-driven wiring.

pub mod bus;
pub mod config;
pub mod delivery;
pub mod dispatcher;
pub mod router;
pub mod sink;
pub mod token_store;

pub use bus::{EventBus, InboundEvent};
pub use config::NotifierConfig;
pub use delivery::webhook::WebhookSink;
pub use dispatcher::{MessageDispatcher, MessageOutcome};
pub use router::MessageRouter;
pub use sink::{LogSink, NotificationSink, SinkError};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
