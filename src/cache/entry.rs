//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with recency metadata,
//! and the monotonic clock that stamps them.

use std::cell::Cell;
use std::time::Instant;

// == Timestamp ==
/// Nanoseconds elapsed since the owning cache's clock was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }
}

// == Monotonic Clock ==
/// Per-cache clock that never hands out the same reading twice.
///
/// Readings follow `Instant`, but a reading that would not advance past the
/// previous one is bumped by a nanosecond so that back-to-back calls within
/// one timer tick still order strictly.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
    last: Cell<u64>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last: Cell::new(0),
        }
    }

    /// Returns a timestamp strictly greater than any previously returned one.
    pub fn now(&self) -> Timestamp {
        let elapsed = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let next = elapsed.max(self.last.get().saturating_add(1));
        self.last.set(next);
        Timestamp(next)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<K, V> {
    pub key: K,
    /// The stored value
    pub value: V,
    /// When this entry was stored
    pub added_at: Timestamp,
    /// Last store or successful read; this is what recency policies rank by
    pub last_accessed_at: Timestamp,
    /// Successful reads since the entry was stored
    pub hit_count: u64,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a fresh entry stamped at `now` with no hits.
    pub fn new(key: K, value: V, now: Timestamp) -> Self {
        Self {
            key,
            value,
            added_at: now,
            last_accessed_at: now,
            hit_count: 0,
        }
    }

    // == Record Hit ==
    /// Marks a successful read at `now`.
    pub fn record_hit(&mut self, now: Timestamp) {
        self.last_accessed_at = now;
        self.hit_count += 1;
    }
}
