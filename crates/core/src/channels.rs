//! Notification channel presentation settings.
//!
//! A sink creates (or refreshes) the channel described by [`ChannelConfig`]
//! before showing a notification on it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Channel used for all admin notifications.
pub const CHANNEL_ADMIN: &str = "admin_notifications";

const ADMIN_CHANNEL_NAME: &str = "Admin Notifications";
const ADMIN_CHANNEL_DESCRIPTION: &str = "Notifications for admin activities";

/// Vibration pattern in milliseconds: delay, on, off, on.
pub const DEFAULT_VIBRATION_PATTERN_MS: [u64; 4] = [0, 500, 500, 500];

/// How intrusively the host should present notifications on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Default,
    High,
}

/// Presentation settings for a notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
    pub lights: bool,
    pub vibration: bool,
    pub show_badge: bool,
    pub vibration_pattern_ms: Vec<u64>,
}

impl ChannelConfig {
    /// Override the channel id, rejecting blank values.
    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::Validation(
                "channel id must not be empty".to_string(),
            ));
        }
        self.id = id;
        Ok(self)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            id: CHANNEL_ADMIN.to_string(),
            name: ADMIN_CHANNEL_NAME.to_string(),
            description: ADMIN_CHANNEL_DESCRIPTION.to_string(),
            importance: Importance::High,
            lights: true,
            vibration: true,
            show_badge: true,
            vibration_pattern_ms: DEFAULT_VIBRATION_PATTERN_MS.to_vec(),
        }
    }
}
