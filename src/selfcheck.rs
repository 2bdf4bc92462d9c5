//! Self Check
//!
//! Exercises a fresh cache end to end: TTL expiry, capacity overflow and
//! concurrent writers. Used by the binary's `--self-check` mode.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use tracing::info;

use crate::cache::{duration_millis, ExpiringCache};

/// Number of writes each concurrent writer performs.
const WRITES_PER_WRITER: usize = 1000;

fn key_name(i: usize) -> String {
    format!("key-{i:02}")
}

/// Runs every check against a new cache of the given size.
pub fn run_self_check(capacity: usize, ttl: Duration) -> Result<()> {
    info!(capacity, ttl_ms = duration_millis(ttl), "creating cache");
    let cache: Arc<ExpiringCache<usize>> = Arc::new(
        ExpiringCache::new(capacity, ttl).context("cannot create cache for self check")?,
    );

    check_ttl(&cache)?;
    check_overflow(&cache)?;
    check_concurrency(&cache)?;

    cache.close();
    info!("self check passed");
    Ok(())
}

fn check_ttl(cache: &ExpiringCache<usize>) -> Result<()> {
    info!("checking TTL");
    let (key, val) = (key_name(1), 3);

    cache.set(key.clone(), val)?;
    match cache.get(&key)? {
        Some(v) if v == val => {}
        other => bail!("{key:?}: got {other:?} right after set"),
    }

    thread::sleep(cache.ttl() * 2);
    ensure!(cache.get(&key)?.is_none(), "{key:?}: got value after TTL");
    ensure!(
        !cache.keys()?.contains(&key),
        "{key:?}: still listed after expiry"
    );

    info!("TTL OK");
    Ok(())
}

fn check_overflow(cache: &ExpiringCache<usize>) -> Result<()> {
    info!("checking overflow");
    let n = cache.capacity() * 2;

    for i in 0..n {
        cache.set(key_name(i), i)?;
    }

    // The first `capacity` keys were evicted; key 0 is among them for any size
    ensure!(
        cache.get(&key_name(0))?.is_none(),
        "{:?}: got value after overflow",
        key_name(0)
    );
    ensure!(
        cache.get(&key_name(n - 1))?.is_some(),
        "{:?}: not found",
        key_name(n - 1)
    );

    info!("overflow OK");
    Ok(())
}

fn check_concurrency(cache: &Arc<ExpiringCache<usize>>) -> Result<()> {
    let writers = cache.capacity() * 3;
    info!(writers, loops = WRITES_PER_WRITER, "checking concurrency");

    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let cache = Arc::clone(cache);
            thread::spawn(move || -> crate::error::Result<()> {
                let key = key_name(w);
                for i in 0..WRITES_PER_WRITER {
                    thread::sleep(Duration::from_micros(1));
                    cache.set(key.clone(), i)?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => bail!("writer thread panicked"),
        }
    }

    let len = cache.len()?;
    ensure!(
        len <= cache.capacity(),
        "cache holds {len} entries, capacity is {}",
        cache.capacity()
    );

    info!("concurrency OK");
    Ok(())
}
