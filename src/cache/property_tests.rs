//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a simple FIFO model.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use crate::cache::{CacheStore, ExpiringCache};

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "k[0-9]{1,2}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

// == Reference Model ==
/// FIFO cache without expiry, the behavior expected while no TTL elapses.
#[derive(Debug, Default)]
struct FifoModel {
    capacity: usize,
    values: HashMap<String, u32>,
    order: VecDeque<String>,
}

impl FifoModel {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    fn set(&mut self, key: String, value: u32) {
        if self.values.contains_key(&key) {
            self.values.insert(key, value);
            return;
        }
        if self.values.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.values.remove(&oldest);
            }
        }
        self.values.insert(key.clone(), value);
        self.order.push_back(key);
    }

    fn remove(&mut self, key: &str) -> Option<u32> {
        let value = self.values.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    fn keys(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Any operation sequence matches the FIFO model and keeps the ledger and
    // map in agreement.
    #[test]
    fn prop_store_matches_fifo_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut store = CacheStore::new(capacity, TEST_TTL).unwrap();
        let mut model = FifoModel::new(capacity);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value);
                    model.set(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key).copied(), model.values.get(&key).copied());
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(store.remove(&key), model.remove(&key));
                }
            }

            prop_assert!(store.len() <= capacity, "size {} exceeds {}", store.len(), capacity);
            prop_assert_eq!(store.keys(), model.keys());
            prop_assert_eq!(store.order_keys(), model.keys());
        }
    }

    // Inserting n distinct keys leaves exactly the last `capacity` of them.
    #[test]
    fn prop_fifo_keeps_newest_keys(capacity in 1usize..10, extra in 0usize..20) {
        let mut store = CacheStore::new(capacity, TEST_TTL).unwrap();
        let total = capacity + extra;

        for i in 0..total {
            store.set(format!("key-{i:02}"), i);
        }

        let expected: Vec<String> = (extra..total).map(|i| format!("key-{i:02}")).collect();
        prop_assert_eq!(store.keys(), expected);
        prop_assert_eq!(store.stats().evictions, extra as u64);
        for i in 0..extra {
            let evicted = format!("key-{i:02}");
            prop_assert_eq!(store.get(&evicted), None);
        }
    }

    // Refreshing any tracked key never changes which key is evicted next.
    #[test]
    fn prop_refresh_does_not_renew_eviction_priority(
        capacity in 2usize..8,
        refreshes in prop::collection::vec(0usize..8, 1..10)
    ) {
        let mut store = CacheStore::new(capacity, TEST_TTL).unwrap();
        for i in 0..capacity {
            store.set(format!("k{i}"), 0u32);
        }

        for idx in refreshes {
            store.set(format!("k{}", idx % capacity), 1);
        }
        store.set("new".to_string(), 2);

        prop_assert_eq!(store.get("k0"), None);
        let mut expected: Vec<String> = (1..capacity).map(|i| format!("k{i}")).collect();
        expected.push("new".to_string());
        prop_assert_eq!(store.keys(), expected);
    }

    // Reads of live keys never mutate the ledger.
    #[test]
    fn prop_get_is_idempotent(
        keys in prop::collection::hash_set(key_strategy(), 1..6),
        reads in prop::collection::vec(key_strategy(), 1..30)
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut store = CacheStore::new(keys.len(), TEST_TTL).unwrap();
        for (i, key) in keys.iter().enumerate() {
            store.set(key.clone(), i);
        }
        let before = store.keys();

        for key in &reads {
            let first = store.get(key).copied();
            let second = store.get(key).copied();
            prop_assert_eq!(first, second);
        }

        prop_assert_eq!(store.keys(), before);
        prop_assert_eq!(store.stats().evictions, 0);
    }
}

// == Property Test for Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error renders as JSON with an "error" string field.
    #[test]
    fn prop_error_response_format(
        error_msg in "[a-zA-Z0-9 _-]{1,100}",
        number in any::<i64>()
    ) {
        use crate::error::CacheError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let error_variants = vec![
            CacheError::NotFound(error_msg.clone()),
            CacheError::InvalidRequest(error_msg.clone()),
            CacheError::InvalidCapacity(number),
            CacheError::InvalidTtl(number),
            CacheError::Closed,
        ];

        let rt = tokio::runtime::Runtime::new().unwrap();
        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = rt.block_on(async {
                to_bytes(response.into_body(), usize::MAX).await.unwrap()
            });
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}

// == Property Test for Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Concurrent writers and readers always leave a consistent, bounded cache,
    // and readers only ever see values some writer stored for that key.
    #[test]
    fn prop_concurrent_operation_correctness(
        capacity in 1usize..10,
        threads in 2usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 10..60)
    ) {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(ExpiringCache::new(capacity, TEST_TTL).unwrap());
        let written: HashSet<(String, u32)> = ops
            .iter()
            .filter_map(|op| match op {
                CacheOp::Set { key, value } => Some((key.clone(), *value)),
                _ => None,
            })
            .collect();
        let written = Arc::new(written);

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let written = Arc::clone(&written);
                let ops = ops.clone();
                thread::spawn(move || {
                    for op in ops {
                        match op {
                            CacheOp::Set { key, value } => cache.set(key, value).unwrap(),
                            CacheOp::Get { key } => {
                                if let Some(value) = cache.get(&key).unwrap() {
                                    assert!(written.contains(&(key, value)));
                                }
                            }
                            CacheOp::Remove { key } => {
                                cache.remove(&key).unwrap();
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            prop_assert!(handle.join().is_ok(), "worker panicked");
        }

        let keys = cache.keys().unwrap();
        let unique: HashSet<&String> = keys.iter().collect();
        prop_assert!(keys.len() <= capacity);
        prop_assert_eq!(unique.len(), keys.len());
        prop_assert_eq!(cache.len().unwrap(), keys.len());
    }
}
