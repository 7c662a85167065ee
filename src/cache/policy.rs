//! Eviction Policy Module
//!
//! Chooses which entry of a full set gives way to a new key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;
use crate::error::CacheError;

// == Eviction Policy ==
/// Victim selection rule applied within a single set.
///
/// Both policies rank entries by `last_accessed_at`. Entries with equal
/// timestamps go to whichever one iteration reaches first; for a hash map
/// that order is unspecified, so callers must not rely on which tied entry
/// is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Evict the entry touched longest ago
    #[default]
    #[serde(alias = "lru")]
    LeastRecentlyUsed,
    /// Evict the entry touched most recently
    #[serde(alias = "mru")]
    MostRecentlyUsed,
}

impl EvictionPolicy {
    // == Select Victim ==
    /// Returns the key to evict from `entries`, or None if there are none.
    ///
    /// Runs in a single pass and never mutates the entries.
    pub fn select_victim<'a, K, V, I>(&self, entries: I) -> Option<&'a K>
    where
        K: 'a,
        V: 'a,
        I: IntoIterator<Item = &'a CacheEntry<K, V>>,
    {
        let mut victim: Option<&'a CacheEntry<K, V>> = None;

        for entry in entries {
            let replace = match victim {
                None => true,
                // Strict comparison keeps the first of several tied entries
                Some(current) => match self {
                    EvictionPolicy::LeastRecentlyUsed => {
                        entry.last_accessed_at < current.last_accessed_at
                    }
                    EvictionPolicy::MostRecentlyUsed => {
                        entry.last_accessed_at > current.last_accessed_at
                    }
                },
            };
            if replace {
                victim = Some(entry);
            }
        }

        victim.map(|entry| &entry.key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::LeastRecentlyUsed => "least_recently_used",
            EvictionPolicy::MostRecentlyUsed => "most_recently_used",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "lru" | "least_recently_used" => Ok(EvictionPolicy::LeastRecentlyUsed),
            "mru" | "most_recently_used" => Ok(EvictionPolicy::MostRecentlyUsed),
            other => Err(CacheError::Configuration(format!(
                "unknown eviction policy: {}",
                other
            ))),
        }
    }
}
