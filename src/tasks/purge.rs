//! Expiry Purge Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{duration_millis, ExpiringCache};

/// Spawns a background task that periodically purges expired entries.
///
/// The task sleeps for `interval` between runs and exits on its own once the
/// cache has been closed.
///
/// # Arguments
/// * `cache` - shared cache handle
/// * `interval` - time between purge runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be aborted during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(ExpiringCache::<String>::new(1000, Duration::from_secs(300))?);
/// let purge_handle = spawn_purge_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task<V>(cache: Arc<ExpiringCache<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Send + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_ms = duration_millis(interval),
            "Starting expiry purge task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = match cache.purge_expired() {
                Ok(removed) => removed,
                Err(_) => {
                    info!("Cache closed, stopping expiry purge task");
                    break;
                }
            };

            if removed > 0 {
                info!("Expiry purge: removed {} expired entries", removed);
            } else {
                debug!("Expiry purge: no expired entries found");
            }
        }
    })
}
