//! Failure-classified retry backoff
//!
//! The retry policy is a pure function of the classified transport error:
//! expected failures (network trouble, API rejections) get a short fixed
//! backoff; anything else signals a programming or environment anomaly and
//! gets a longer one. API rejections deliberately share the short backoff
//! even though some (bad credentials) are not transient; differentiating
//! them is tracked as future work.

use std::time::Duration;

use contracts::TransportError;

/// Backoff after an expected transport failure
pub const EXPECTED_FAILURE_BACKOFF: Duration = Duration::from_secs(5);

/// Backoff after an unclassified failure
pub const UNEXPECTED_FAILURE_BACKOFF: Duration = Duration::from_secs(10);

/// Delay to wait before retrying after `error`
pub fn backoff_for(error: &TransportError) -> Duration {
    if error.is_expected() {
        EXPECTED_FAILURE_BACKOFF
    } else {
        UNEXPECTED_FAILURE_BACKOFF
    }
}

/// Label used for failure metrics and logs
pub(crate) fn failure_kind(error: &TransportError) -> &'static str {
    match error {
        TransportError::Network { .. } => "network",
        TransportError::Api { .. } => "api",
        TransportError::Decode { .. } => "decode",
    }
}
