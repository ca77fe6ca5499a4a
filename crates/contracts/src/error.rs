//! Classified transport errors
//!
//! The poll loop's retry policy is a pure function of these variants, so the
//! transport boundary must classify every failure before it surfaces here.
//! A long-poll timeout is deliberately NOT an error: the transport maps it to
//! an empty batch.

use thiserror::Error;

/// Failure surfaced by the transport boundary
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connectivity problem below the long-poll timeout (DNS, connect,
    /// reset, TLS)
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service answered but declined the request
    #[error("api rejected request with status {status}: {body}")]
    Api { status: u16, body: String },

    /// The service answered 2xx but the payload did not decode
    #[error("failed to decode payload: {message}")]
    Decode { message: String },
}

impl TransportError {
    /// Create a network error without an underlying source
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error wrapping the underlying cause
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an API rejection error
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a payload decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// True for the failure kinds the poll loop expects during normal
    /// operation (short backoff); everything else is an anomaly (long
    /// backoff).
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Api { .. })
    }
}
