//! UpdateSource trait - transport boundary abstraction
//!
//! Decouples the poll loop from the concrete HTTP client so tests can drive
//! the loop with a scripted in-memory source.

use std::time::Duration;

use crate::{TransportError, Update};

/// Source of inbound updates
///
/// Implementations must return updates in ascending id order and classify
/// every failure into a [`TransportError`] variant. A long-poll timeout is
/// reported as `Ok` with an empty batch, never as an error.
#[trait_variant::make(UpdateSource: Send)]
pub trait LocalUpdateSource {
    /// Fetch updates newer than `cursor`, holding the request open up to
    /// `timeout`.
    async fn fetch_updates(
        &self,
        cursor: i64,
        timeout: Duration,
    ) -> Result<Vec<Update>, TransportError>;
}
