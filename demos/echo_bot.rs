//! Echo Bot Demo
//!
//! Polls the live service and echoes text messages back, with a greeting
//! command and a photo acknowledgement. Ctrl+C stops the loop cooperatively.
//!
//! Run with: BOT_TOKEN=<token> cargo run -p demos --bin echo_bot

use anyhow::Context;

use client::BotClient;
use contracts::PollingConfig;
use dispatcher::{Dispatcher, Handler};
use observability::{LogFormat, ObservabilityConfig};
use updater::Updater;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init_with_config(ObservabilityConfig {
        log_format: LogFormat::Compact,
        metrics_port: None,
        default_log_level: "info".to_string(),
    })?;

    let token = std::env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?;
    let client = BotClient::new(&token)?;

    // Registration order is routing priority: commands first, then the
    // unfiltered echo, then photos (photo-only messages carry no text, so
    // the echo fallback never shadows them).
    let mut dispatcher = Dispatcher::new();

    let greeter = client.clone();
    dispatcher.add_handler(Handler::command(["start", "help"], move |update| {
        let client = greeter.clone();
        async move {
            client
                .send_message(
                    update.message.chat.id,
                    "Hi! Send me any text and I will echo it back.",
                )
                .await?;
            Ok(())
        }
    }));

    let echoer = client.clone();
    dispatcher.add_handler(Handler::fallback(move |update| {
        let client = echoer.clone();
        async move {
            if let Some(text) = update.message.text.clone() {
                client.send_message(update.message.chat.id, &text).await?;
            }
            Ok(())
        }
    }));

    let acker = client.clone();
    dispatcher.add_handler(Handler::photo(move |update| {
        let client = acker.clone();
        async move {
            let reply = match update.message.best_photo() {
                Some(photo) => format!("Nice photo ({}x{})!", photo.width, photo.height),
                None => "Nice photo!".to_string(),
            };
            client.send_message(update.message.chat.id, &reply).await?;
            Ok(())
        }
    }));

    let mut updater = Updater::new(client, dispatcher);

    let stop = updater.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received, stopping after the current iteration");
            stop.stop();
        }
    });

    tracing::info!("Echo bot started; press Ctrl+C to stop");
    updater.start(PollingConfig::default()).await?;

    let metrics = updater.dispatcher().metrics_snapshot();
    tracing::info!(
        handled = metrics.handled_count,
        failures = metrics.failure_count,
        unmatched = metrics.unmatched_count,
        "Echo bot stopped"
    );
    Ok(())
}
