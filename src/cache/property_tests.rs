//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the engine against a plain HashMap model and to
//! check the capacity and eviction rules over random operation sequences.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;

use bytes::Bytes;

use crate::cache::{CacheEngine, EvictionKind};
use crate::config::EngineConfig;

// == Test Configuration ==
const LARGE_CAPACITY: usize = 16 * 1024 * 1024;

fn engine_with(shard_count: usize, capacity_bytes: usize) -> CacheEngine {
    CacheEngine::new(&EngineConfig {
        shard_count,
        capacity_bytes,
        max_entry_bytes: capacity_bytes,
        eviction: EvictionKind::Lru,
    })
}

fn no_ttl() -> chrono::Duration {
    chrono::Duration::zero()
}

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Without capacity pressure the engine behaves exactly like a map: one
    // live value per key, deletes report presence, gets see the latest set.
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let engine = engine_with(4, LARGE_CAPACITY);
        let mut model: HashMap<String, Vec<u8>> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let evicted = engine.set(&key, value.clone(), no_ttl(), false).unwrap();
                    prop_assert!(!evicted);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = engine.get(&key).unwrap();
                    prop_assert_eq!(got, model.get(&key).map(|v| Bytes::from(v.clone())));
                }
                CacheOp::Delete { key } => {
                    let deleted = engine.delete(&key).unwrap();
                    prop_assert_eq!(deleted, model.remove(&key).is_some());
                }
            }
            prop_assert_eq!(engine.len(), model.len() as u64);
        }

        let expected_bytes: usize = model.values().map(Vec::len).sum();
        prop_assert_eq!(engine.stats().size_bytes, expected_bytes);
    }

    // After every set the held bytes stay within capacity, and the evicted
    // flag is raised exactly when the eviction counter moved.
    #[test]
    fn prop_capacity_bound_and_evicted_flag(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let capacity = 128;
        let engine = engine_with(1, capacity);

        for (key, value) in entries {
            let before = engine.stats().evictions;
            let evicted = engine.set(&key, value.clone(), no_ttl(), false).unwrap();
            let stats = engine.stats();

            prop_assert!(stats.size_bytes <= capacity, "{} > {}", stats.size_bytes, capacity);
            prop_assert_eq!(evicted, stats.evictions > before);
            // The value just written always survives its own set
            prop_assert_eq!(engine.get(&key).unwrap(), Some(Bytes::from(value)));
        }
    }

    // Deleting a key that is not present never changes anything.
    #[test]
    fn prop_delete_absent_is_noop(
        present in prop::collection::hash_set("[a-m]{3}", 0..10),
        absent in "[n-z]{3}"
    ) {
        let engine = engine_with(4, LARGE_CAPACITY);
        for key in &present {
            engine.set(key, key.clone(), no_ttl(), false).unwrap();
        }
        let before = engine.stats();

        prop_assert!(!engine.delete(&absent).unwrap());
        prop_assert!(!engine.delete(&absent).unwrap());

        let after = engine.stats();
        prop_assert_eq!(after.total_entries, before.total_entries);
        prop_assert_eq!(after.size_bytes, before.size_bytes);
    }
}

// Property tests for LRU eviction behavior
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Filling a shard exactly and adding one more key evicts the first key
    // inserted and nothing else.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec("[a-z]{1,8}", 2..10),
        new_key in "[A-Z]{1,8}",
    ) {
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        prop_assume!(unique_keys.len() >= 2);

        let value_size = 8;
        let engine = engine_with(1, unique_keys.len() * value_size);

        for key in &unique_keys {
            prop_assert!(!engine.set(key, vec![1u8; value_size], no_ttl(), false).unwrap());
        }

        prop_assert!(engine.set(&new_key, vec![2u8; value_size], no_ttl(), false).unwrap());
        prop_assert_eq!(engine.len(), unique_keys.len() as u64);

        prop_assert!(engine.get(&unique_keys[0]).unwrap().is_none());
        prop_assert!(engine.get(&new_key).unwrap().is_some());
        for key in unique_keys.iter().skip(1) {
            prop_assert!(engine.get(key).unwrap().is_some(), "{} should survive", key);
        }
    }

    // A get refreshes a key: the next victim becomes the second-oldest.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec("[a-z]{1,8}", 3..8),
        new_key in "[A-Z]{1,8}",
    ) {
        let unique_keys: Vec<String> = keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        prop_assume!(unique_keys.len() >= 3);

        let value_size = 4;
        let engine = engine_with(1, unique_keys.len() * value_size);

        for key in &unique_keys {
            engine.set(key, vec![0u8; value_size], no_ttl(), false).unwrap();
        }

        let accessed_key = &unique_keys[0];
        prop_assert!(engine.get(accessed_key).unwrap().is_some());

        engine.set(&new_key, vec![0u8; value_size], no_ttl(), false).unwrap();

        prop_assert!(engine.get(accessed_key).unwrap().is_some());
        prop_assert!(engine.get(&unique_keys[1]).unwrap().is_none());
        prop_assert!(engine.get(&new_key).unwrap().is_some());
    }
}

// == Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Concurrent set/get/delete on one key: every read returns one of the
    // values written, whole, and the final state is one of the writes or
    // absent.
    #[test]
    fn prop_concurrent_same_key(
        writes in prop::collection::vec(1u8..=255, 2..8),
        rounds in 10usize..50,
    ) {
        let engine = Arc::new(engine_with(8, LARGE_CAPACITY));
        let written: HashSet<u8> = writes.iter().copied().collect();

        let handles: Vec<_> = writes
            .iter()
            .enumerate()
            .map(|(i, &fill)| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    for round in 0..rounds {
                        match (i + round) % 3 {
                            0 => {
                                engine.set("shared", vec![fill; 256], no_ttl(), false).unwrap();
                            }
                            1 => {
                                if let Some(value) = engine.get("shared").unwrap() {
                                    seen.push(value);
                                }
                            }
                            _ => {
                                engine.delete("shared").unwrap();
                            }
                        }
                    }
                    seen
                })
            })
            .collect();

        for handle in handles {
            for value in handle.join().unwrap() {
                prop_assert_eq!(value.len(), 256);
                prop_assert!(value.iter().all(|b| *b == value[0]), "torn read");
                prop_assert!(written.contains(&value[0]));
            }
        }

        if let Some(last) = engine.get("shared").unwrap() {
            prop_assert!(written.contains(&last[0]));
        }
        prop_assert!(engine.len() <= 1);
    }
}
