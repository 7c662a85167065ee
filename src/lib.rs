//! Set Assoc Cache - an in-process N-way set-associative cache
//!
//! A fixed item budget is split into equally sized sets. Each key is routed
//! to exactly one set by its hash, and the eviction policy only ever scans
//! that one set.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{
    CacheEntry, CacheKey, CacheStats, EvictionPolicy, SetAssociativeCache, StoreOutcome,
    MAX_CAPACITY,
};
pub use config::{CacheConfig, ResolvedConfig};
pub use error::{CacheError, Result};
