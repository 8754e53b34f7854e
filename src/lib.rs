//! Shard Cache - A sharded in-memory byte cache
//!
//! Provides per-entry TTL expiration, byte-bounded capacity with LRU
//! eviction, and a background expiration sweeper, plus a thin HTTP adapter.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheEngine;
pub use config::{Config, EngineConfig};
pub use error::{CacheError, Result};
pub use tasks::Sweeper;
