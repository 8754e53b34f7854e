//! Cache Module
//!
//! Sharded in-memory byte cache with TTL expiration and pluggable eviction.
//!
//! ```text
//! CacheEngine ── hash(key) ──> Mutex<Shard> ── HashMap<String, CacheEntry>
//!                                          └── Box<dyn EvictionPolicy>
//! ```

mod engine;
mod entry;
mod lru;
mod policy;
mod shard;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::CacheEngine;
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use policy::{EvictionKind, EvictionPolicy, FifoPolicy, LruPolicy};
pub use shard::Shard;
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum key length accepted by the HTTP adapter, in bytes
pub const MAX_KEY_LENGTH: usize = 256;
