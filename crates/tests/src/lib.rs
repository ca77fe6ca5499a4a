//! # Integration Tests
//!
//! End-to-end tests over the whole engine: scripted transport source ->
//! updater poll loop -> dispatcher -> handlers. No network required.

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_client_builds_against_default_endpoint() {
        let client = client::BotClient::new("test-token");
        assert!(client.is_ok());
        assert!(client::DEFAULT_BASE_URL.starts_with("https://"));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use contracts::{PollingConfig, TransportError, UpdateId};
    use dispatcher::{Dispatcher, Handler};
    use tokio::time::Instant;
    use updater::scripted::{photo_update, text_update, ScriptedSource};
    use updater::{LifecycleState, Updater, EXPECTED_FAILURE_BACKOFF};

    fn run_updater(source: &ScriptedSource, dispatcher: Dispatcher) -> Updater<ScriptedSource> {
        let updater = Updater::new(source.clone(), dispatcher);
        source.stop_when_exhausted(updater.stop_handle());
        updater
    }

    /// Scenario: command handler registered before the fallback wins for
    /// command-shaped text; the fallback still sees plain text.
    #[tokio::test(start_paused = true)]
    async fn test_command_routes_before_fallback() {
        let command_calls = Arc::new(AtomicU64::new(0));
        let fallback_calls = Arc::new(AtomicU64::new(0));

        let mut dispatcher = Dispatcher::new();
        let calls = Arc::clone(&command_calls);
        dispatcher.add_handler(Handler::command(["start"], move |_| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }));
        let calls = Arc::clone(&fallback_calls);
        dispatcher.add_handler(Handler::fallback(move |_| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }));

        let source = ScriptedSource::new([
            Ok(vec![]), // probe
            Ok(vec![text_update(101, "/start now"), text_update(102, "hello")]),
        ]);
        let mut updater = run_updater(&source, dispatcher);
        updater.start(PollingConfig::default()).await.unwrap();

        assert_eq!(command_calls.load(Ordering::Relaxed), 1);
        assert_eq!(fallback_calls.load(Ordering::Relaxed), 1);
        assert_eq!(updater.cursor(), 102);
    }

    /// Scenario: a batch is dispatched strictly in order and the cursor
    /// lands on the last id even when a handler in the middle fails.
    #[tokio::test(start_paused = true)]
    async fn test_batch_order_survives_handler_failure() {
        let order: Arc<Mutex<Vec<UpdateId>>> = Arc::new(Mutex::new(Vec::new()));

        let mut dispatcher = Dispatcher::new();
        let seen = Arc::clone(&order);
        dispatcher.add_handler(Handler::command(["boom"], move |update| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(update.id);
                Err(anyhow::anyhow!("handler exploded"))
            }
        }));
        let seen = Arc::clone(&order);
        dispatcher.add_handler(Handler::text(move |update| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(update.id);
                Ok(())
            }
        }));

        let source = ScriptedSource::new([
            Ok(vec![]), // probe
            Ok(vec![
                text_update(101, "first"),
                text_update(102, "/boom"),
                text_update(103, "third"),
            ]),
        ]);
        let mut updater = run_updater(&source, dispatcher);
        updater.start(PollingConfig::default()).await.unwrap();

        assert_eq!(*order.lock().unwrap(), vec![101, 102, 103]);
        assert_eq!(updater.cursor(), 103);

        let metrics = updater.dispatcher().metrics_snapshot();
        assert_eq!(metrics.handled_count, 3);
        assert_eq!(metrics.failure_count, 1);
    }

    /// Scenario: an idle long poll (timeout mapped to an empty batch) adds
    /// no delay beyond the poll interval and leaves the cursor untouched.
    #[tokio::test(start_paused = true)]
    async fn test_idle_poll_has_no_extra_delay() {
        let source = ScriptedSource::new([
            Ok(vec![]), // probe
            Ok(vec![]), // long poll expired, nothing new
        ]);
        let mut updater = run_updater(&source, Dispatcher::new());

        let started = Instant::now();
        updater.start(PollingConfig::default()).await.unwrap();

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(updater.cursor(), 0);
        assert_eq!(updater.dispatcher().metrics_snapshot().handled_count, 0);
    }

    /// Photo updates route past text-only handlers to the photo handler.
    #[tokio::test(start_paused = true)]
    async fn test_photo_routing() {
        let photo_calls = Arc::new(AtomicU64::new(0));

        let mut dispatcher = Dispatcher::new();
        dispatcher.add_handler(Handler::fallback(|_| async { Ok(()) }));
        let calls = Arc::clone(&photo_calls);
        dispatcher.add_handler(Handler::photo(move |update| {
            let calls = Arc::clone(&calls);
            async move {
                assert!(update.message.best_photo().is_some());
                calls.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }));

        let source = ScriptedSource::new([
            Ok(vec![]), // probe
            Ok(vec![photo_update(11, "file-abc")]),
        ]);
        let mut updater = run_updater(&source, dispatcher);
        updater.start(PollingConfig::default()).await.unwrap();

        assert_eq!(photo_calls.load(Ordering::Relaxed), 1);
        assert_eq!(updater.cursor(), 11);
    }

    /// A transport failure mid-run delays the loop once and never loses or
    /// replays updates.
    #[tokio::test(start_paused = true)]
    async fn test_failure_recovery_end_to_end() {
        let handled: Arc<Mutex<Vec<UpdateId>>> = Arc::new(Mutex::new(Vec::new()));

        let mut dispatcher = Dispatcher::new();
        let seen = Arc::clone(&handled);
        dispatcher.add_handler(Handler::text(move |update| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(update.id);
                Ok(())
            }
        }));

        let source = ScriptedSource::new([
            Ok(vec![]), // probe
            Ok(vec![text_update(1, "one")]),
            Err(TransportError::network("simulated outage")),
            Ok(vec![text_update(2, "two")]),
        ]);
        let mut updater = run_updater(&source, dispatcher);

        let started = Instant::now();
        updater.start(PollingConfig::default()).await.unwrap();

        assert_eq!(started.elapsed(), EXPECTED_FAILURE_BACKOFF);
        assert_eq!(*handled.lock().unwrap(), vec![1, 2]);
        // The failed cycle retried the same cursor: no regression, no skip
        assert_eq!(source.fetch_cursors(), vec![0, 0, 1, 1, 2]);
    }

    /// The stop handle halts a loop running on another task, idempotently.
    #[tokio::test(start_paused = true)]
    async fn test_stop_handle_from_another_task() {
        let source = ScriptedSource::new([Ok(vec![])]); // probe; then endless idle polls
        let mut updater = Updater::new(source, Dispatcher::new());
        let handle = updater.stop_handle();

        let config = PollingConfig {
            poll_interval_secs: 1.0,
            ..Default::default()
        };
        let task = tokio::spawn(async move {
            updater.start(config).await.map(|()| updater)
        });

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(handle.state(), LifecycleState::Running);

        handle.stop();
        handle.stop(); // idempotent

        let updater = task.await.unwrap().unwrap();
        assert_eq!(updater.state(), LifecycleState::Stopped);
    }
}
