//! Inbound push message and outbound notification request types.
//!
//! Both types are transient: they are built per delivered message, handed
//! through the classifier and never persisted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// MessageEvent
// ---------------------------------------------------------------------------

/// A single push message as delivered by the messaging provider.
///
/// A message may carry pre-rendered title/body text, a string data map,
/// both, or neither. The empty message is valid input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageEvent {
    /// Sender identifier reported by the provider. Logged only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Provider-assigned message id. Logged only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Title text rendered by the sending backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered_title: Option<String>,

    /// Body text rendered by the sending backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered_body: Option<String>,

    /// Application-defined key/value pairs.
    pub data: HashMap<String, String>,
}

impl MessageEvent {
    /// Build a rendered message with optional title and body.
    pub fn rendered(title: Option<&str>, body: Option<&str>) -> Self {
        Self {
            rendered_title: title.map(str::to_string),
            rendered_body: body.map(str::to_string),
            ..Self::default()
        }
    }

    /// Build a data-only message from key/value pairs.
    pub fn data<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::default().with_data(pairs)
    }

    /// Merge key/value pairs into the data map.
    pub fn with_data<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.data
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Attach the sender identifier.
    pub fn with_sender(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Attach the provider message id.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Decode a message from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the sending backend supplied a rendered title or body.
    pub fn is_rendered(&self) -> bool {
        self.rendered_title.is_some() || self.rendered_body.is_some()
    }

    /// Whether the message carries neither rendered text nor data.
    pub fn is_empty(&self) -> bool {
        !self.is_rendered() && self.data.is_empty()
    }

    /// Value of the `type` discriminator, if any.
    pub fn message_type(&self) -> Option<&str> {
        self.data.get("type").map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// NotificationRequest
// ---------------------------------------------------------------------------

/// Which classification branch produced a [`NotificationRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Pre-rendered text from the sending backend.
    Rendered,
    /// A new device was registered.
    DeviceRegistered,
    /// A UPI PIN was captured on a device.
    UpiDetected,
    /// Any other data-only message.
    Generic,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Rendered => write!(f, "rendered"),
            NotificationKind::DeviceRegistered => write!(f, "device_registered"),
            NotificationKind::UpiDetected => write!(f, "upi_detected"),
            NotificationKind::Generic => write!(f, "generic"),
        }
    }
}

/// A renderable notification handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Copied verbatim from the message data so that opening the
    /// notification can route to the matching in-app destination.
    pub extras: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn default_event_is_empty() {
        let event = MessageEvent::default();
        assert!(event.is_empty());
        assert!(!event.is_rendered());
        assert!(event.message_type().is_none());
    }

    #[test]
    fn body_alone_counts_as_rendered() {
        let event = MessageEvent::rendered(None, Some("hello"));
        assert!(event.is_rendered());
        assert!(!event.is_empty());
    }

    #[test]
    fn data_builder_collects_pairs() {
        let event = MessageEvent::data([("type", "upi_detected"), ("upi_pin", "1234")])
            .with_sender("backend")
            .with_message_id("m-1");

        assert_eq!(event.message_type(), Some("upi_detected"));
        assert_eq!(event.data.len(), 2);
        assert_eq!(event.from.as_deref(), Some("backend"));
        assert_eq!(event.message_id.as_deref(), Some("m-1"));
    }

    #[test]
    fn from_json_fills_missing_fields_with_defaults() {
        let event = MessageEvent::from_json(r#"{"data": {"type": "device_registered"}}"#)
            .expect("valid payload");

        assert!(event.rendered_title.is_none());
        assert!(event.from.is_none());
        assert_eq!(event.message_type(), Some("device_registered"));
    }

    #[test]
    fn from_json_rejects_non_string_data_values() {
        let result = MessageEvent::from_json(r#"{"data": {"count": 3}}"#);
        assert_matches!(result, Err(CoreError::Payload(_)));
    }

    #[test]
    fn kind_display_matches_serde_name() {
        let json = serde_json::to_string(&NotificationKind::UpiDetected).unwrap();
        assert_eq!(json, "\"upi_detected\"");
        assert_eq!(NotificationKind::UpiDetected.to_string(), "upi_detected");
        assert_eq!(NotificationKind::Generic.to_string(), "generic");
    }
}
