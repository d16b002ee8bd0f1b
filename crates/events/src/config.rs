//! Notifier configuration loaded from environment variables.

use std::path::PathBuf;

use panel_core::{ChannelConfig, CoreError};

use crate::bus::DEFAULT_CAPACITY;

/// Wiring choices for the notifier process.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// File backing the token store; `None` keeps the token in memory.
    pub token_path: Option<PathBuf>,
    /// Relay endpoint for notifications; `None` logs them instead.
    pub webhook_url: Option<String>,
    /// Channel all notifications are shown on.
    pub channel: ChannelConfig,
    /// Buffer size of the inbound event queue; the reader waits when it is full.
    pub bus_capacity: usize,
}

impl NotifierConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default               |
    /// |-------------------------|-----------------------|
    /// | `NOTIFIER_TOKEN_PATH`   | unset (memory store)  |
    /// | `NOTIFIER_WEBHOOK_URL`  | unset (log sink)      |
    /// | `NOTIFIER_CHANNEL_ID`   | `admin_notifications` |
    /// | `NOTIFIER_BUS_CAPACITY` | `1024`                |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let channel = match non_blank("NOTIFIER_CHANNEL_ID") {
            Some(id) => ChannelConfig::default().with_id(id)?,
            None => ChannelConfig::default(),
        };

        let bus_capacity = match non_blank("NOTIFIER_BUS_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "NOTIFIER_BUS_CAPACITY must be a positive integer, got {raw:?}"
                    ))
                })?,
            None => DEFAULT_CAPACITY,
        };

        Ok(Self {
            token_path: non_blank("NOTIFIER_TOKEN_PATH").map(PathBuf::from),
            webhook_url: non_blank("NOTIFIER_WEBHOOK_URL"),
            channel,
            bus_capacity,
        })
    }
}
