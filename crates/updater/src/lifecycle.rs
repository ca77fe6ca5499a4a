//! Poll-loop lifecycle state machine
//!
//! `Idle -> Running -> Stopping -> Stopped`, with `Stopped -> Running`
//! allowed so an updater can be restarted. Stop is cooperative: it flips
//! `Running` to `Stopping` and the loop exits at the next iteration
//! boundary; an in-flight fetch is never cancelled.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::error::UpdaterError;

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// Created, never started
    Idle = 0,
    /// Loop is polling
    Running = 1,
    /// Stop requested; loop finishes the current iteration
    Stopping = 2,
    /// Loop has exited
    Stopped = 3,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Idle as u8),
        }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Transition into `Running` from `Idle` or `Stopped`
    pub(crate) fn begin(&self) -> Result<(), UpdaterError> {
        for from in [LifecycleState::Idle, LifecycleState::Stopped] {
            if self
                .state
                .compare_exchange(
                    from as u8,
                    LifecycleState::Running as u8,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return Ok(());
            }
        }
        Err(UpdaterError::NotStartable {
            state: self.state(),
        })
    }

    /// Request a cooperative stop; true when this call performed the
    /// `Running -> Stopping` transition
    pub(crate) fn request_stop(&self) -> bool {
        self.state
            .compare_exchange(
                LifecycleState::Running as u8,
                LifecycleState::Stopping as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.state() == LifecycleState::Stopping
    }

    /// Mark the loop as exited
    pub(crate) fn finish(&self) {
        self.state
            .store(LifecycleState::Stopped as u8, Ordering::Release);
    }
}

/// Clonable handle that can stop a running updater from anywhere
///
/// Stopping is idempotent and takes effect at the next iteration boundary.
#[derive(Debug, Clone)]
pub struct StopHandle {
    inner: Arc<Lifecycle>,
}

impl StopHandle {
    pub(crate) fn new(inner: Arc<Lifecycle>) -> Self {
        Self { inner }
    }

    /// Signal the loop to exit after the current iteration
    pub fn stop(&self) {
        if self.inner.request_stop() {
            info!("updater stop requested");
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.inner.state()
    }
}
