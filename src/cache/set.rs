//! Cache Set Module
//!
//! One associative set: a bounded key to entry map. All capacity enforcement
//! and eviction happen here, one set at a time.

use std::collections::HashMap;

use tracing::{debug, error};

use crate::cache::{CacheEntry, CacheKey, EvictionPolicy, Timestamp};
use crate::error::{CacheError, Result};

// == Store Outcome ==
/// What a successful `store` did to the owning set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome<K> {
    /// The key was new and the set had room
    Inserted,
    /// The key was already present; its entry was replaced wholesale
    Replaced,
    /// The set was full; the returned key was evicted to make room
    Evicted(K),
}

// == Cache Set ==
#[derive(Debug)]
pub struct CacheSet<K, V> {
    entries: HashMap<K, CacheEntry<K, V>>,
    capacity: usize,
}

impl<K: CacheKey, V> CacheSet<K, V> {
    /// Creates an empty set holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    // == Get ==
    /// Looks up `key`, recording a hit at `now` if present.
    pub fn get(&mut self, key: &K, now: Timestamp) -> Option<&V> {
        self.entries.get_mut(key).map(|entry| {
            entry.record_hit(now);
            &entry.value
        })
    }

    /// Looks up `key` without touching its recency.
    pub fn peek(&self, key: &K) -> Option<&CacheEntry<K, V>> {
        self.entries.get(key)
    }

    // == Store ==
    /// Stores `value` under `key`, evicting through `policy` when full.
    ///
    /// Fails with `InvariantViolation`, leaving the set untouched, if the set
    /// is already over capacity or the policy cannot name a victim.
    pub fn store(
        &mut self,
        key: K,
        value: V,
        policy: EvictionPolicy,
        now: Timestamp,
    ) -> Result<StoreOutcome<K>> {
        if let Some(entry) = self.entries.get_mut(&key) {
            *entry = CacheEntry::new(key, value, now);
            return Ok(StoreOutcome::Replaced);
        }

        if self.entries.len() > self.capacity {
            return Err(self.invariant_violation(format!(
                "set holds {} entries but its capacity is {}",
                self.entries.len(),
                self.capacity
            )));
        }

        let outcome = if self.entries.len() < self.capacity {
            StoreOutcome::Inserted
        } else {
            let victim = match policy.select_victim(self.entries.values()) {
                Some(victim) => victim.clone(),
                None => {
                    return Err(self.invariant_violation(format!(
                        "{} policy selected no victim in a full set of {}",
                        policy, self.capacity
                    )))
                }
            };
            self.entries.remove(&victim);
            debug!("Evicted key with hash {} ({})", victim.hash_code(), policy);
            StoreOutcome::Evicted(victim)
        };

        self.entries.insert(key.clone(), CacheEntry::new(key, value, now));
        Ok(outcome)
    }

    // == Remove ==
    pub fn remove(&mut self, key: &K) -> Option<CacheEntry<K, V>> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry<K, V>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn invariant_violation(&self, message: String) -> CacheError {
        error!("Cache set invariant violated: {}", message);
        CacheError::InvariantViolation(message)
    }
}
