//! Cache Module
//!
//! Bounded in-memory cache with TTL expiration and FIFO eviction.

mod entry;
mod order;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use shared::ExpiringCache;
pub use stats::CacheStats;
pub use store::CacheStore;

use std::time::Duration;

// == Public Constants ==
/// Maximum allowed key length in bytes accepted by the HTTP front-end
pub const MAX_KEY_LENGTH: usize = 256;

/// Longest accepted TTL (100 years). Keeps `now + ttl` representable for
/// every entry written during the cache's lifetime.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
