//! Updater error types

use thiserror::Error;

use contracts::ConfigValidationError;

use crate::lifecycle::LifecycleState;

/// Updater errors
///
/// Recoverable fetch failures never surface here; they are absorbed by the
/// loop's backoff policy. `start` fails only on caller misuse.
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// `start` called while the loop is active
    #[error("updater cannot start from state {state:?}")]
    NotStartable { state: LifecycleState },

    /// Rejected polling configuration
    #[error(transparent)]
    InvalidConfig(#[from] ConfigValidationError),
}
