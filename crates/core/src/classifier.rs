//! Message-to-notification classification.
//!
//! [`classify`] is a pure function: it inspects a [`MessageEvent`], picks a
//! branch in a fixed priority order and synthesizes the title/body pair.
//! Missing keys are filled from defaults; nothing here can fail.

use std::collections::HashMap;

use crate::message::{MessageEvent, NotificationKind, NotificationRequest};

/// `type` value sent when a new device registers.
pub const MESSAGE_TYPE_DEVICE_REGISTERED: &str = "device_registered";

/// `type` value sent when a UPI PIN is captured.
pub const MESSAGE_TYPE_UPI_DETECTED: &str = "upi_detected";

/// Title used when neither the rendered payload nor the data supplies one.
pub const DEFAULT_TITLE: &str = "New Notification";

/// Body used for generic data-only messages without a `body` key.
pub const DEFAULT_BODY: &str = "You have a new notification";

/// Model name used when a device registration omits `model`.
pub const UNKNOWN_DEVICE: &str = "Unknown Device";

const DEVICE_REGISTERED_TITLE: &str = "New Device Registered";
const UPI_DETECTED_TITLE: &str = "UPI PIN Detected";

/// Decide whether `event` should produce a notification and build it.
///
/// Priority order:
/// 1. rendered title or body present: use them (data-type dispatch is skipped),
/// 2. non-empty data: dispatch on `data["type"]`,
/// 3. otherwise: `None`.
pub fn classify(event: &MessageEvent) -> Option<NotificationRequest> {
    if event.is_rendered() {
        return Some(NotificationRequest {
            kind: NotificationKind::Rendered,
            title: event
                .rendered_title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: event.rendered_body.clone().unwrap_or_default(),
            extras: event.data.clone(),
        });
    }

    if event.data.is_empty() {
        return None;
    }

    Some(classify_data(&event.data))
}

fn classify_data(data: &HashMap<String, String>) -> NotificationRequest {
    let (kind, title, body) = match data.get("type").map(String::as_str) {
        Some(MESSAGE_TYPE_DEVICE_REGISTERED) => (
            NotificationKind::DeviceRegistered,
            DEVICE_REGISTERED_TITLE.to_string(),
            device_registered_body(data),
        ),
        Some(MESSAGE_TYPE_UPI_DETECTED) => (
            NotificationKind::UpiDetected,
            UPI_DETECTED_TITLE.to_string(),
            upi_detected_body(data),
        ),
        _ => (
            NotificationKind::Generic,
            field_or(data, "title", DEFAULT_TITLE).to_string(),
            field_or(data, "body", DEFAULT_BODY).to_string(),
        ),
    };

    NotificationRequest {
        kind,
        title,
        body,
        extras: data.clone(),
    }
}

fn device_registered_body(data: &HashMap<String, String>) -> String {
    let model = field_or(data, "model", UNKNOWN_DEVICE);
    match non_empty(data, "app_type") {
        Some(app_type) => format!("{model} ({app_type})"),
        None => model.to_string(),
    }
}

// Missing pin/device still emit their labels with an empty value.
fn upi_detected_body(data: &HashMap<String, String>) -> String {
    let upi_pin = field_or(data, "upi_pin", "");
    let device_id = field_or(data, "device_id", "");
    match non_empty(data, "model") {
        Some(model) => format!("PIN: {upi_pin} - Device: {device_id} ({model})"),
        None => format!("PIN: {upi_pin} - Device: {device_id}"),
    }
}

fn field_or<'a>(data: &'a HashMap<String, String>, key: &str, default: &'a str) -> &'a str {
    data.get(key).map(String::as_str).unwrap_or(default)
}

fn non_empty<'a>(data: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    data.get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> MessageEvent {
        MessageEvent::data(pairs.iter().copied())
    }

    #[test]
    fn empty_event_produces_nothing() {
        assert!(classify(&MessageEvent::default()).is_none());
    }

    #[test]
    fn rendered_title_only_gets_empty_body() {
        let req = classify(&MessageEvent::rendered(Some("Hi"), None)).unwrap();
        assert_eq!(req.kind, NotificationKind::Rendered);
        assert_eq!(req.title, "Hi");
        assert_eq!(req.body, "");
        assert!(req.extras.is_empty());
    }

    #[test]
    fn rendered_body_only_gets_default_title() {
        let req = classify(&MessageEvent::rendered(None, Some("Body"))).unwrap();
        assert_eq!(req.title, DEFAULT_TITLE);
        assert_eq!(req.body, "Body");
    }

    #[test]
    fn rendered_payload_wins_over_data_type() {
        let event = MessageEvent::rendered(Some("Hi"), None)
            .with_data([("type", "upi_detected"), ("upi_pin", "9")]);

        let req = classify(&event).unwrap();
        assert_eq!(req.kind, NotificationKind::Rendered);
        assert_eq!(req.title, "Hi");
        assert_eq!(req.body, "");
        assert_eq!(req.extras, event.data);
    }

    #[test]
    fn device_registered_with_app_type() {
        let event = data(&[
            ("type", "device_registered"),
            ("model", "Pixel 7"),
            ("app_type", "retail"),
        ]);
        let req = classify(&event).unwrap();
        assert_eq!(req.kind, NotificationKind::DeviceRegistered);
        assert_eq!(req.title, "New Device Registered");
        assert_eq!(req.body, "Pixel 7 (retail)");
        assert_eq!(req.extras, event.data);
    }

    #[test]
    fn device_registered_without_model() {
        let req = classify(&data(&[("type", "device_registered")])).unwrap();
        assert_eq!(req.body, "Unknown Device");
    }

    #[test]
    fn device_registered_ignores_empty_app_type() {
        let event = data(&[
            ("type", "device_registered"),
            ("model", "Pixel 7"),
            ("app_type", ""),
        ]);
        assert_eq!(classify(&event).unwrap().body, "Pixel 7");
    }

    #[test]
    fn device_registered_unknown_model_with_app_type() {
        let event = data(&[("type", "device_registered"), ("app_type", "retail")]);
        assert_eq!(classify(&event).unwrap().body, "Unknown Device (retail)");
    }

    #[test]
    fn upi_detected_with_all_fields() {
        let event = data(&[
            ("type", "upi_detected"),
            ("upi_pin", "1234"),
            ("device_id", "D1"),
            ("model", "X"),
        ]);
        let req = classify(&event).unwrap();
        assert_eq!(req.kind, NotificationKind::UpiDetected);
        assert_eq!(req.title, "UPI PIN Detected");
        assert_eq!(req.body, "PIN: 1234 - Device: D1 (X)");
    }

    #[test]
    fn upi_detected_keeps_labels_when_fields_missing() {
        let req = classify(&data(&[("type", "upi_detected")])).unwrap();
        assert_eq!(req.body, "PIN:  - Device: ");
    }

    #[test]
    fn upi_detected_skips_empty_model() {
        let event = data(&[
            ("type", "upi_detected"),
            ("upi_pin", "1"),
            ("device_id", "D"),
            ("model", ""),
        ]);
        assert_eq!(classify(&event).unwrap().body, "PIN: 1 - Device: D");
    }

    #[test]
    fn unknown_type_falls_back_to_defaults() {
        let req = classify(&data(&[("foo", "bar")])).unwrap();
        assert_eq!(req.kind, NotificationKind::Generic);
        assert_eq!(req.title, "New Notification");
        assert_eq!(req.body, "You have a new notification");
    }

    #[test]
    fn generic_uses_data_title_and_body() {
        let event = data(&[("type", "promo"), ("title", "Sale"), ("body", "50% off")]);
        let req = classify(&event).unwrap();
        assert_eq!(req.title, "Sale");
        assert_eq!(req.body, "50% off");
    }

    #[test]
    fn classification_is_idempotent() {
        let event = data(&[("type", "upi_detected"), ("upi_pin", "42")]);
        assert_eq!(classify(&event), classify(&event));
    }
}
