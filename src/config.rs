//! Configuration Module
//!
//! Handles loading and managing cache engine configuration from environment variables.

use std::env;
use std::time::Duration;

/// Shortest period allowed between two background sweeps.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Default size ceiling: 64 MiB of estimated entry data.
pub const DEFAULT_SIZE_LIMIT: u64 = 64 * 1024 * 1024;

/// Cache engine configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Period between background sweeps of expired entries
    pub sweep_interval: Duration,
    /// Ceiling in bytes on the estimated aggregate size of live entries
    pub size_limit: u64,
}

impl CacheConfig {
    /// Creates a config with the given sweep interval and size limit.
    pub fn new(sweep_interval: Duration, size_limit: u64) -> Self {
        Self {
            sweep_interval,
            size_limit,
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 1)
    /// - `CACHE_SIZE_LIMIT_BYTES` - Size ceiling in bytes (default: 64 MiB)
    pub fn from_env() -> Self {
        Self {
            sweep_interval: env::var("CACHE_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(MIN_SWEEP_INTERVAL),
            size_limit: env::var("CACHE_SIZE_LIMIT_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SIZE_LIMIT),
        }
    }

    /// Sweep interval actually used by the engine, never below one second.
    pub fn effective_sweep_interval(&self) -> Duration {
        self.sweep_interval.max(MIN_SWEEP_INTERVAL)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: MIN_SWEEP_INTERVAL,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.sweep_interval, Duration::from_secs(1));
        assert_eq!(config.size_limit, DEFAULT_SIZE_LIMIT);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_SWEEP_INTERVAL_SECS");
        env::remove_var("CACHE_SIZE_LIMIT_BYTES");

        let config = CacheConfig::from_env();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_sweep_interval_is_clamped() {
        let config = CacheConfig::new(Duration::from_millis(1), 50);
        assert_eq!(config.effective_sweep_interval(), MIN_SWEEP_INTERVAL);

        let config = CacheConfig::new(Duration::from_secs(5), 50);
        assert_eq!(config.effective_sweep_interval(), Duration::from_secs(5));
    }
}
