//! Poll loop configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use torrent_webui_client::PollConfig;
//!
//! let config = PollConfig::new()
//!     .with_interval(Duration::from_secs(5))
//!     .with_error_threshold(5);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};
use crate::protocol::keys;

// ============================================================================
// Constants
// ============================================================================

/// Default time between ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Default number of consecutive failures that declares the connection lost.
pub const DEFAULT_ERROR_THRESHOLD: u32 = 3;

// ============================================================================
// PollConfig
// ============================================================================

/// Timing and request shape shared by the poll loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between ticks.
    pub interval: Duration,

    /// Consecutive failures that declare the connection lost.
    pub error_threshold: u32,

    /// Status keys requested for the torrent grid on every tick.
    pub grid_keys: Vec<String>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl PollConfig {
    /// Creates the default configuration: 2 s interval, threshold 3, grid keys.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            grid_keys: keys::GRID.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl PollConfig {
    /// Sets the time between ticks.
    #[inline]
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the failure threshold.
    #[inline]
    #[must_use]
    pub fn with_error_threshold(mut self, threshold: u32) -> Self {
        self.error_threshold = threshold;
        self
    }

    /// Replaces the grid keys.
    #[must_use]
    pub fn with_grid_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grid_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl PollConfig {
    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero interval or a zero threshold.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::config("Poll interval must be greater than zero"));
        }
        if self.error_threshold == 0 {
            return Err(Error::config("Error threshold must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_millis(2000));
        assert_eq!(config.error_threshold, 3);
        assert_eq!(config.grid_keys.len(), keys::GRID.len());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = PollConfig::new()
            .with_interval(Duration::from_millis(500))
            .with_error_threshold(5)
            .with_grid_keys(["name", "state"]);

        assert_eq!(config.interval, Duration::from_millis(500));
        assert_eq!(config.error_threshold, 5);
        assert_eq!(config.grid_keys, vec!["name", "state"]);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let zero_interval = PollConfig::new().with_interval(Duration::ZERO);
        assert!(matches!(zero_interval.validate(), Err(Error::Config { .. })));

        let zero_threshold = PollConfig::new().with_error_threshold(0);
        assert!(matches!(zero_threshold.validate(), Err(Error::Config { .. })));
    }
}
