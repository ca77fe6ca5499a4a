//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Updates routed to a handler
    handled_count: AtomicU64,
    /// Handler actions that returned an error
    failure_count: AtomicU64,
    /// Updates no handler matched
    unmatched_count: AtomicU64,
}

impl DispatchMetrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates routed to a handler
    pub fn handled_count(&self) -> u64 {
        self.handled_count.load(Ordering::Relaxed)
    }

    pub(crate) fn inc_handled_count(&self) {
        self.handled_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Handler actions that returned an error
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub(crate) fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Updates no handler matched
    pub fn unmatched_count(&self) -> u64 {
        self.unmatched_count.load(Ordering::Relaxed)
    }

    pub(crate) fn inc_unmatched_count(&self) {
        self.unmatched_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of all counters
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            handled_count: self.handled_count(),
            failure_count: self.failure_count(),
            unmatched_count: self.unmatched_count(),
        }
    }
}

/// Point-in-time copy of dispatch counters (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSnapshot {
    pub handled_count: u64,
    pub failure_count: u64,
    pub unmatched_count: u64,
}
