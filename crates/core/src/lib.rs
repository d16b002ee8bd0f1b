//! Core push-message types and classification.
//!
//! - [`MessageEvent`] — an inbound push message (rendered text and/or data).
//! - [`NotificationRequest`] — the notification to hand to a sink.
//! - [`classify`] — the pure mapping between the two.
//! - [`ChannelConfig`] — presentation settings for the notification channel.

pub mod channels;
pub mod classifier;
pub mod error;
pub mod message;

pub use channels::ChannelConfig;
pub use classifier::classify;
pub use error::CoreError;
pub use message::{MessageEvent, NotificationKind, NotificationRequest};
