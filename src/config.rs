//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Cache and server configuration parameters.
///
/// Capacity and TTL are signed so that zero and negative inputs reach
/// validation in [`ExpiringCache::from_config`](crate::cache::ExpiringCache::from_config)
/// instead of being silently replaced by defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: i64,
    /// TTL in milliseconds applied to every entry
    pub ttl_ms: i64,
    /// HTTP server port
    pub server_port: u16,
    /// Background purge interval in milliseconds, 0 disables it
    pub purge_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `TTL_MS` - Entry TTL in milliseconds (default: 300000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PURGE_INTERVAL_MS` - Background purge frequency (default: 0, disabled)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            ttl_ms: env_or("TTL_MS", defaults.ttl_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            purge_interval_ms: env_or("PURGE_INTERVAL_MS", defaults.purge_interval_ms),
        }
    }

    /// Returns the purge interval, or `None` when the background purge is off.
    pub fn purge_interval(&self) -> Option<Duration> {
        (self.purge_interval_ms > 0).then(|| Duration::from_millis(self.purge_interval_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl_ms: 300_000,
            server_port: 3000,
            purge_interval_ms: 0,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
