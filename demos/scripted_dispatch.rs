//! Scripted Dispatch Demo
//!
//! Runs the full poll loop against an in-memory scripted source, so the
//! routing and backoff behavior can be observed without a server. The
//! simulated network blip pauses the loop for the short failure backoff
//! (5 seconds) before the final batch arrives.
//!
//! Run with: cargo run -p demos --bin scripted_dispatch

use contracts::{PollingConfig, TransportError};
use dispatcher::{Dispatcher, Handler};
use observability::{LogFormat, ObservabilityConfig};
use updater::scripted::{photo_update, text_update, ScriptedSource};
use updater::Updater;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init_with_config(ObservabilityConfig {
        log_format: LogFormat::Compact,
        metrics_port: None,
        default_log_level: "debug".to_string(),
    })?;

    let mut dispatcher = Dispatcher::new();
    dispatcher.add_handler(Handler::command(["start"], |update| async move {
        tracing::info!(update_id = update.id, "command handler: /start");
        Ok(())
    }));
    dispatcher.add_handler(Handler::photo(|update| async move {
        let photo = update.message.best_photo();
        tracing::info!(update_id = update.id, photo = ?photo, "photo handler");
        Ok(())
    }));
    dispatcher.add_handler(Handler::fallback(|update| async move {
        tracing::info!(
            update_id = update.id,
            text = update.message.text.as_deref().unwrap_or(""),
            "fallback handler"
        );
        Ok(())
    }));

    let source = ScriptedSource::new([
        // Startup probe finds a backlog; the loop skips past it
        Ok(vec![text_update(99, "stale backlog message")]),
        Ok(vec![
            text_update(101, "/start now"),
            text_update(102, "hello there"),
        ]),
        Err(TransportError::network("simulated network blip")),
        Ok(vec![photo_update(103, "file-abc")]),
    ]);

    let mut updater = Updater::new(source.clone(), dispatcher);
    source.stop_when_exhausted(updater.stop_handle());

    updater.start(PollingConfig::default()).await?;

    let metrics = updater.dispatcher().metrics_snapshot();
    tracing::info!(
        cursor = updater.cursor(),
        handled = metrics.handled_count,
        unmatched = metrics.unmatched_count,
        fetches = source.fetch_cursors().len(),
        "scripted run complete"
    );
    Ok(())
}
