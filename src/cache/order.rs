//! Insertion Order Module
//!
//! Ledger of first-insertion order used to pick FIFO eviction victims.

use std::collections::VecDeque;

// == Insertion Order ==
/// Tracks the order in which keys were first inserted.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion (next eviction victim)
/// - Back = Newest insertion
///
/// A key appears at most once. Refreshing a key does not move it.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    /// Creates an empty ledger with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
        }
    }

    // == Push ==
    /// Appends a newly inserted key at the tail.
    ///
    /// Callers only push keys that are not already tracked.
    pub fn push(&mut self, key: String) {
        debug_assert!(!self.contains(&key), "key already tracked: {key}");
        self.order.push_back(key);
    }

    // == Remove ==
    /// Splices out the single occurrence of `key`.
    ///
    /// Linear scan; returns false if the key was not tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.order.iter().position(|k| k == key) {
            Some(idx) => {
                self.order.remove(idx);
                true
            }
            None => false,
        }
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest inserted key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    /// Iterates keys oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
