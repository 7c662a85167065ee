//! Cache Module
//!
//! Provides an N-way set-associative cache with pluggable LRU/MRU eviction.

mod entry;
mod key;
mod partition;
mod policy;
mod set;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, MonotonicClock, Timestamp};
pub use key::{string_hash_code, CacheKey};
pub use partition::Partitioner;
pub use policy::EvictionPolicy;
pub use set::{CacheSet, StoreOutcome};
pub use stats::CacheStats;
pub use store::SetAssociativeCache;

// == Public Constants ==
/// Upper bound on `total_capacity`, kept well inside the entry count a single
/// process can reasonably index
pub const MAX_CAPACITY: usize = 200_000_000;

/// Item budget used when `total_capacity` is left unset
pub const DEFAULT_TOTAL_CAPACITY: usize = 500;

/// Set size used when `set_size` is left unset
pub const DEFAULT_SET_SIZE: usize = 10;
