// ── Session configuration ──
//
// Runtime settings for a polling session. Built by the config crate from
// a profile, or directly by embedders.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(10);
pub const MAX_SCAN_INTERVAL: Duration = Duration::from_secs(300);
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_DETAILS_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_DISCOVERY_INTERVAL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Budget for one opportunistic background subtask.
pub const SUBTASK_TIMEOUT: Duration = Duration::from_secs(30);

/// A snapshot older than this is reported unavailable.
pub const STALE_AFTER: Duration = Duration::from_secs(120);

/// Settings for one polling session over one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub network_id: String,
    /// Primary status poll period, 10–300 s.
    pub scan_interval: Duration,
    /// Minimum spacing between device-detail checks. Zero checks every cycle.
    pub details_interval: Duration,
    /// Minimum spacing between new-device discovery runs.
    pub discovery_interval: Duration,
    /// Per-request HTTP timeout for the device reads a session makes.
    /// Applied to the `MeshApi` each coordinator is given.
    pub request_timeout: Duration,
}

impl SessionConfig {
    pub fn new(network_id: impl Into<String>) -> Self {
        Self {
            network_id: network_id.into(),
            scan_interval: DEFAULT_SCAN_INTERVAL,
            details_interval: DEFAULT_DETAILS_INTERVAL,
            discovery_interval: DEFAULT_DISCOVERY_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    pub fn with_details_interval(mut self, interval: Duration) -> Self {
        self.details_interval = interval;
        self
    }

    pub fn with_discovery_interval(mut self, interval: Duration) -> Self {
        self.discovery_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.network_id.trim().is_empty() {
            return Err(CoreError::validation("network id must not be empty"));
        }
        if !(MIN_SCAN_INTERVAL..=MAX_SCAN_INTERVAL).contains(&self.scan_interval) {
            return Err(CoreError::validation(format!(
                "scan interval must be between {}s and {}s, got {}s",
                MIN_SCAN_INTERVAL.as_secs(),
                MAX_SCAN_INTERVAL.as_secs(),
                self.scan_interval.as_secs_f64()
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(CoreError::validation("request timeout must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::new("net-1");
        assert!(config.validate().is_ok());
        assert_eq!(config.scan_interval, Duration::from_secs(30));
        assert_eq!(config.details_interval, Duration::from_secs(300));
        assert_eq!(config.discovery_interval, Duration::from_secs(900));
    }

    #[test]
    fn scan_interval_bounds_are_inclusive() {
        for secs in [10, 300] {
            let config = SessionConfig::new("net-1").with_scan_interval(Duration::from_secs(secs));
            assert!(config.validate().is_ok(), "{secs}s");
        }
        for secs in [9, 301] {
            let config = SessionConfig::new("net-1").with_scan_interval(Duration::from_secs(secs));
            assert!(config.validate().is_err(), "{secs}s");
        }
    }

    #[test]
    fn empty_network_is_rejected() {
        assert!(SessionConfig::new("  ").validate().is_err());
    }
}
