//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry purge: removes expired cache entries at a configured interval
//!   (off by default; the cache otherwise expires entries lazily on read)

mod purge;

pub use purge::spawn_purge_task;
