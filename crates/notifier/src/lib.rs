//! Stdin inbound adapter for the push message dispatcher.
//!
//! Each input line is one JSON [`InboundEvent`], e.g.
//!
//! ```text
//! {"kind": "message", "data": {"type": "device_registered", "model": "Pixel 7"}}
//! {"kind": "token_refresh", "token": "c9Xk..."}
//! ```

use std::sync::Arc;

use anyhow::Context;
use panel_events::{
    FileTokenStore, InboundEvent, LogSink, MemoryTokenStore, MessageDispatcher, NotificationSink,
    NotifierConfig, TokenStore, WebhookSink,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Build a dispatcher with the sink and token store selected by `config`.
pub fn build_dispatcher(config: &NotifierConfig) -> anyhow::Result<MessageDispatcher> {
    let sink: Arc<dyn NotificationSink> = match &config.webhook_url {
        Some(url) => {
            tracing::info!(url = %url, "Forwarding notifications to relay");
            Arc::new(
                WebhookSink::new(url.clone(), &config.channel)
                    .context("Failed to build relay HTTP client")?,
            )
        }
        None => {
            tracing::info!("No relay configured, logging notifications");
            Arc::new(LogSink::new(&config.channel))
        }
    };

    let tokens: Arc<dyn TokenStore> = match &config.token_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Persisting device token to file");
            Arc::new(FileTokenStore::new(path.clone()))
        }
        None => Arc::new(MemoryTokenStore::new()),
    };

    Ok(MessageDispatcher::new(sink, tokens).with_channel(config.channel.clone()))
}

/// Decode one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Result<InboundEvent, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Queue every decodable line of `reader` for the router until EOF.
///
/// Sending waits while the queue is full, so a slow sink slows the reader
/// down instead of losing events. Lines that are not valid UTF-8 or not a
/// valid event are logged and skipped. Stops early if the router has gone
/// away. Returns the number of events queued.
pub async fn pump_lines<R>(
    mut reader: R,
    queue: &mpsc::Sender<InboundEvent>,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut published = 0;
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("Failed to read input")?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(
                    line = line_no,
                    error = %e,
                    "Skipping inbound line with invalid UTF-8"
                );
                continue;
            }
        };

        match parse_line(line) {
            None => continue,
            Some(Ok(event)) => {
                if queue.send(event).await.is_err() {
                    tracing::warn!(line = line_no, "Router stopped, no further input is read");
                    break;
                }
                published += 1;
            }
            Some(Err(e)) => {
                tracing::warn!(line = line_no, error = %e, "Skipping malformed inbound event");
            }
        }
    }

    Ok(published)
}
