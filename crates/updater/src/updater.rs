//! Updater - the long-polling ingestion loop

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, instrument, trace, warn};

use contracts::{PollingConfig, TransportError, UpdateId, UpdateSource};
use dispatcher::Dispatcher;

use crate::backoff::{backoff_for, failure_kind};
use crate::error::UpdaterError;
use crate::lifecycle::{Lifecycle, LifecycleState, StopHandle};

/// Long-polling update loop
///
/// Owns the cursor for its whole lifetime: the dispatcher and handlers never
/// see or mutate it. The loop recovers every transport failure locally with
/// a fixed backoff and only exits through [`StopHandle::stop`].
pub struct Updater<S> {
    source: S,
    dispatcher: Dispatcher,
    cursor: UpdateId,
    lifecycle: Arc<Lifecycle>,
}

impl<S: UpdateSource> Updater<S> {
    /// Create an updater over a transport source and a configured dispatcher
    ///
    /// Register all handlers on the dispatcher before calling [`Self::start`];
    /// the registry is frozen while the loop runs.
    pub fn new(source: S, dispatcher: Dispatcher) -> Self {
        Self {
            source,
            dispatcher,
            cursor: 0,
            lifecycle: Arc::new(Lifecycle::new()),
        }
    }

    /// Handle that can stop the loop from another task
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.lifecycle))
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Id of the last dispatched update (0 before anything was dispatched)
    pub fn cursor(&self) -> UpdateId {
        self.cursor
    }

    /// The owned dispatcher (e.g. for metrics snapshots)
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run the poll loop until a stop is requested
    ///
    /// Blocks the calling task. Fails only on caller misuse (invalid config,
    /// already running); recoverable fetch failures are absorbed by the
    /// backoff policy and never surface here.
    #[instrument(name = "updater_start", skip(self, config))]
    pub async fn start(&mut self, config: PollingConfig) -> Result<(), UpdaterError> {
        config.validate()?;
        self.lifecycle.begin()?;

        self.cursor = self.recover_cursor(&config).await;
        observability::record_cursor_recovered(self.cursor);
        info!(
            cursor = self.cursor,
            poll_interval_secs = config.poll_interval_secs,
            request_timeout_secs = config.request_timeout_secs,
            "update polling started"
        );

        while !self.lifecycle.stop_requested() {
            self.run_iteration(&config).await;
        }

        self.lifecycle.finish();
        info!(cursor = self.cursor, "update polling stopped");
        Ok(())
    }

    /// One poll cycle: fetch, dispatch in order, advance the cursor, sleep
    async fn run_iteration(&mut self, config: &PollingConfig) {
        match self
            .source
            .fetch_updates(self.cursor, config.request_timeout())
            .await
        {
            Ok(updates) => {
                if let Some(last_id) = updates.last().map(|u| u.id) {
                    for update in &updates {
                        self.dispatcher.process(update).await;
                    }
                    // Advance only after the whole batch was offered; handler
                    // failures are isolated and must not cause redelivery
                    self.cursor = last_id;
                    debug!(count = updates.len(), cursor = self.cursor, "batch dispatched");
                    observability::record_batch_dispatched(updates.len(), self.cursor);
                } else {
                    // Long-poll expiry or genuinely no traffic
                    trace!(cursor = self.cursor, "poll returned no updates");
                    observability::record_idle_poll();
                }
            }
            Err(error) => {
                let delay = backoff_for(&error);
                self.log_fetch_failure(&error, delay);
                observability::record_fetch_failure(failure_kind(&error), delay.as_secs());
                sleep(delay).await;
                // The failure backoff replaces this cycle's idle sleep
                return;
            }
        }

        let interval = config.poll_interval();
        if !interval.is_zero() {
            sleep(interval).await;
        }
    }

    /// Best-effort probe for the newest message id, so historical backlog is
    /// skipped instead of replayed
    ///
    /// Probe failures are swallowed and default to cursor 0.
    #[instrument(name = "updater_recover_cursor", skip(self, config))]
    async fn recover_cursor(&self, config: &PollingConfig) -> UpdateId {
        match self
            .source
            .fetch_updates(0, config.startup_probe_timeout())
            .await
        {
            Ok(updates) => match updates.last() {
                Some(last) => {
                    info!(
                        cursor = last.id,
                        backlog = updates.len(),
                        "skipping existing message backlog"
                    );
                    last.id
                }
                None => {
                    info!("no existing messages; starting from 0");
                    0
                }
            },
            Err(error) => {
                warn!(error = %error, "initial cursor probe failed; starting from 0");
                0
            }
        }
    }

    fn log_fetch_failure(&self, error: &TransportError, delay: Duration) {
        let retry_in_secs = delay.as_secs();
        match error {
            TransportError::Api { status, body } => error!(
                status = *status,
                body = %body,
                retry_in_secs,
                "api rejected update fetch"
            ),
            TransportError::Network { .. } => error!(
                error = %error,
                retry_in_secs,
                "network failure during update fetch"
            ),
            other => error!(
                error = ?other,
                retry_in_secs,
                "unexpected failure during update fetch"
            ),
        }
    }
}
