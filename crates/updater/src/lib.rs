//! # Updater
//!
//! The poll loop: owns the cursor, drives an [`contracts::UpdateSource`],
//! classifies fetch failures into fixed backoffs, and feeds each retrieved
//! update to the dispatcher in order. Lifecycle is an explicit
//! `Idle -> Running -> Stopping -> Stopped` state machine with cooperative
//! stop at iteration boundaries.

mod backoff;
mod error;
mod lifecycle;
pub mod scripted;
mod updater;

pub use backoff::{backoff_for, EXPECTED_FAILURE_BACKOFF, UNEXPECTED_FAILURE_BACKOFF};
pub use error::UpdaterError;
pub use lifecycle::{LifecycleState, StopHandle};
pub use updater::Updater;
