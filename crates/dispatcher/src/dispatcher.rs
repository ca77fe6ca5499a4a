//! Dispatcher - first-match-wins routing of updates to handlers

use std::sync::Arc;

use tracing::{debug, error, trace};

use contracts::Update;

use crate::handler::Handler;
use crate::metrics::{DispatchMetrics, DispatchSnapshot};

/// What `process` did with an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler matched and its action ran (it may still have failed
    /// internally; failures are isolated and logged)
    Handled,
    /// No registered handler matched; the update was dropped silently
    NoMatch,
}

/// Routes updates to the earliest-registered matching handler
///
/// The registry is append-only and its order is significant: the first
/// handler whose rule matches wins, and scanning stops there. Mutating the
/// registry while a poll loop is running is unsupported.
pub struct Dispatcher {
    handlers: Vec<Handler>,
    metrics: Arc<DispatchMetrics>,
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Append a handler to the registry
    ///
    /// Registration order is the routing priority; register from most to
    /// least specific.
    pub fn add_handler(&mut self, handler: Handler) {
        debug!(rule = %handler.rule(), position = self.handlers.len(), "registered handler");
        self.handlers.push(handler);
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Shared metrics handle
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Snapshot of dispatch counters
    pub fn metrics_snapshot(&self) -> DispatchSnapshot {
        self.metrics.snapshot()
    }

    /// Route one update to the first matching handler
    ///
    /// At most one action runs. A failing action is caught, logged with the
    /// handler's rule identity, and never retried; the update still counts
    /// as delivered so the caller's cursor may advance.
    pub async fn process(&self, update: &Update) -> DispatchOutcome {
        for handler in &self.handlers {
            if !handler.matches(update) {
                continue;
            }

            trace!(update_id = update.id, rule = %handler.rule(), "update matched");
            self.metrics.inc_handled_count();

            if let Err(cause) = handler.invoke(update.clone()).await {
                self.metrics.inc_failure_count();
                error!(
                    update_id = update.id,
                    rule = %handler.rule(),
                    error = %cause,
                    "handler failed"
                );
            }
            return DispatchOutcome::Handled;
        }

        trace!(update_id = update.id, "no handler matched");
        self.metrics.inc_unmatched_count();
        DispatchOutcome::NoMatch
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
