use std::sync::Arc;

use panel_events::{MessageRouter, NotifierConfig};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panel_notifier=debug,panel_events=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = NotifierConfig::from_env()?;
    tracing::info!(
        channel = %config.channel.id,
        bus_capacity = config.bus_capacity,
        "Loaded notifier configuration"
    );

    // --- Dispatcher & router ---
    let dispatcher = Arc::new(panel_notifier::build_dispatcher(&config)?);
    let (queue, inbox) = mpsc::channel(config.bus_capacity);
    let cancel = CancellationToken::new();

    let router = tokio::spawn(MessageRouter::new(dispatcher).run_queue(inbox, cancel.clone()));

    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, shutting down");
            ctrl_c.cancel();
        }
    });

    // --- Inbound ---
    let stdin = BufReader::new(tokio::io::stdin());
    let published = tokio::select! {
        result = panel_notifier::pump_lines(stdin, &queue) => match result {
            Ok(published) => published,
            Err(e) => {
                tracing::error!(error = %e, "Stopped reading inbound events");
                0
            }
        },
        _ = cancel.cancelled() => 0,
    };

    // Closing the queue lets the router drain what was already queued.
    drop(queue);
    let handled = router.await?;
    tracing::info!(published, handled, "Notifier stopped");

    Ok(())
}
