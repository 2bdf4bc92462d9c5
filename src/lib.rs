//! Expiring Cache - a bounded, expiring, concurrency-safe key/value cache
//!
//! Entries live for a fixed TTL, capacity is counted in entries, and the
//! oldest inserted key is evicted first when the cache is full. A small HTTP
//! front-end exposes one cache instance over the network.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod selfcheck;
pub mod tasks;

pub use api::AppState;
pub use cache::ExpiringCache;
pub use config::Config;
pub use error::CacheError;
pub use selfcheck::run_self_check;
pub use tasks::spawn_purge_task;
