//! Polling configuration contract shared across crates

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration field
#[derive(Debug, Clone, Error)]
#[error("invalid config at '{field}': {message}")]
pub struct ConfigValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Idle sleep between poll iterations, in seconds (zero = back-to-back
    /// long polls)
    #[serde(default)]
    pub poll_interval_secs: f64,

    /// Long-poll request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for the one-shot startup cursor probe, in seconds
    #[serde(default = "default_startup_probe_timeout_secs")]
    pub startup_probe_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    25
}

fn default_startup_probe_timeout_secs() -> u64 {
    5
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 0.0,
            request_timeout_secs: default_request_timeout_secs(),
            startup_probe_timeout_secs: default_startup_probe_timeout_secs(),
        }
    }
}

impl PollingConfig {
    /// Validate field ranges
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.poll_interval_secs.is_finite() || self.poll_interval_secs < 0.0 {
            return Err(ConfigValidationError {
                field: "poll_interval_secs",
                message: "must be a finite value >= 0",
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigValidationError {
                field: "request_timeout_secs",
                message: "must be at least 1",
            });
        }
        if self.startup_probe_timeout_secs == 0 {
            return Err(ConfigValidationError {
                field: "startup_probe_timeout_secs",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn startup_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_probe_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PollingConfig::default();
        assert_eq!(config.poll_interval_secs, 0.0);
        assert_eq!(config.request_timeout_secs, 25);
        assert_eq!(config.startup_probe_timeout_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: PollingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(25));
        assert!(config.poll_interval().is_zero());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = PollingConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_interval() {
        let config = PollingConfig {
            poll_interval_secs: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
