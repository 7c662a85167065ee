//! Cache Store Module
//!
//! Main cache engine: routes every key to one associative set by hash range
//! and lets that set enforce its own bound through the eviction policy.

use tracing::{debug, info};

use crate::cache::{
    CacheEntry, CacheKey, CacheSet, CacheStats, MonotonicClock, Partitioner, StoreOutcome,
};
use crate::config::{CacheConfig, ResolvedConfig};
use crate::error::{CacheError, Result};

// == Initialized State ==
/// Everything that only exists once the configuration has been frozen.
#[derive(Debug)]
struct Engine<K, V> {
    resolved: ResolvedConfig,
    partitioner: Partitioner,
    /// `None` marks a set that has not been materialized yet; boxed so an
    /// empty slot costs one pointer
    sets: Vec<Option<Box<CacheSet<K, V>>>>,
    len: usize,
}

impl<K: CacheKey, V> Engine<K, V> {
    fn new(resolved: ResolvedConfig) -> Self {
        let set_size = resolved.set_size;
        let mut sets = Vec::with_capacity(resolved.set_count);
        sets.resize_with(resolved.set_count, || {
            resolved
                .eager_set_creation
                .then(|| Box::new(CacheSet::new(set_size)))
        });

        Self {
            resolved,
            partitioner: Partitioner::new(resolved.set_count),
            sets,
            len: 0,
        }
    }

    fn index_of(&self, key: &K) -> usize {
        self.partitioner.set_index(key.hash_code())
    }

    /// Returns the owning set, creating it on first access.
    fn set_for(&mut self, key: &K) -> (usize, &mut CacheSet<K, V>) {
        let index = self.index_of(key);
        let set_size = self.resolved.set_size;
        let set = self.sets[index].get_or_insert_with(|| {
            debug!("Materializing set {}", index);
            Box::new(CacheSet::new(set_size))
        });
        (index, set.as_mut())
    }

    /// Returns the owning set only if it already exists.
    fn existing_set_for(&self, key: &K) -> Option<&CacheSet<K, V>> {
        self.sets[self.index_of(key)].as_deref()
    }
}

// == Set Associative Cache ==
/// N-way set-associative cache.
///
/// The cache is configured first, then frozen by [`initialize`](Self::initialize).
/// Every data operation before that fails with [`CacheError::NotInitialized`].
///
/// ```
/// use set_assoc_cache::{CacheConfig, EvictionPolicy, SetAssociativeCache};
///
/// let mut cache = SetAssociativeCache::with_config(
///     CacheConfig::new()
///         .with_total_capacity(100)
///         .with_set_size(4)
///         .with_eviction_policy(EvictionPolicy::LeastRecentlyUsed),
/// );
/// cache.initialize().unwrap();
///
/// cache.store("answer".to_string(), 42).unwrap();
/// assert_eq!(cache.try_get(&"answer".to_string()).unwrap(), Some(&42));
/// ```
#[derive(Debug)]
pub struct SetAssociativeCache<K, V> {
    config: CacheConfig,
    engine: Option<Engine<K, V>>,
    clock: MonotonicClock,
    stats: CacheStats,
}

impl<K: CacheKey, V> SetAssociativeCache<K, V> {
    // == Constructors ==
    /// Creates an uninitialized cache with every setting left at its default.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates an uninitialized cache from `config`.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            engine: None,
            clock: MonotonicClock::new(),
            stats: CacheStats::new(),
        }
    }

    /// Creates and initializes a cache in one step.
    pub fn initialized(config: CacheConfig) -> Result<Self> {
        let mut cache = Self::with_config(config);
        cache.initialize()?;
        Ok(cache)
    }

    // == Configuration ==
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Mutable access to the configuration, refused once initialized.
    pub fn config_mut(&mut self) -> Result<&mut CacheConfig> {
        if self.engine.is_some() {
            return Err(CacheError::Configuration(
                "configuration is frozen after initialization".to_string(),
            ));
        }
        Ok(&mut self.config)
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    // == Initialize ==
    /// Applies defaults, validates the configuration and lays out the sets.
    ///
    /// May succeed only once; a failed attempt leaves the cache uninitialized
    /// so the configuration can be fixed and the call retried.
    pub fn initialize(&mut self) -> Result<()> {
        if self.engine.is_some() {
            return Err(CacheError::Configuration(
                "cache is already initialized".to_string(),
            ));
        }

        let resolved = self.config.resolve()?;
        info!(
            "Cache initialized: total_capacity={}, set_size={}, sets={}, policy={}, eager={}",
            resolved.total_capacity,
            resolved.set_size,
            resolved.set_count,
            resolved.policy,
            resolved.eager_set_creation
        );
        self.engine = Some(Engine::new(resolved));
        Ok(())
    }

    // == Try Get ==
    /// Looks up `key`.
    ///
    /// A hit refreshes the entry's `last_accessed_at` and bumps its
    /// `hit_count`, which changes what recency policies evict next. A miss has
    /// no effect on any entry. Lookups never evict.
    pub fn try_get(&mut self, key: &K) -> Result<Option<&V>> {
        let engine = self.engine.as_mut().ok_or(CacheError::NotInitialized)?;
        ensure_present(key, "try_get")?;

        let now = self.clock.now();
        let (_, set) = engine.set_for(key);
        match set.get(key, now) {
            Some(value) => {
                self.stats.record_hit();
                Ok(Some(value))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Store ==
    /// Stores `value` under `key`.
    ///
    /// Re-storing an existing key replaces its entry (fresh timestamps, zero
    /// hits) without counting as an eviction. Storing a new key into a full
    /// set first evicts the policy's victim, which is returned.
    pub fn store(&mut self, key: K, value: V) -> Result<StoreOutcome<K>> {
        let engine = self.engine.as_mut().ok_or(CacheError::NotInitialized)?;
        ensure_present(&key, "store")?;

        let now = self.clock.now();
        let policy = engine.resolved.policy;
        let (index, set) = engine.set_for(&key);
        let outcome = set.store(key, value, policy, now)?;

        match &outcome {
            StoreOutcome::Inserted => engine.len += 1,
            StoreOutcome::Replaced => self.stats.record_overwrite(),
            StoreOutcome::Evicted(_) => {
                debug!("Store into full set {} triggered an eviction", index);
                self.stats.record_eviction();
            }
        }
        Ok(outcome)
    }

    // == Remove ==
    /// Removes `key`, returning its value. Not counted as an eviction.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>> {
        let engine = self.engine.as_mut().ok_or(CacheError::NotInitialized)?;
        ensure_present(key, "remove")?;

        let index = engine.index_of(key);
        let removed = engine.sets[index]
            .as_mut()
            .and_then(|set| set.remove(key));
        if removed.is_some() {
            engine.len -= 1;
        }
        Ok(removed.map(|entry| entry.value))
    }

    /// Drops every entry; materialized sets stay materialized.
    pub fn clear(&mut self) -> Result<()> {
        let engine = self.engine.as_mut().ok_or(CacheError::NotInitialized)?;
        engine
            .sets
            .iter_mut()
            .flatten()
            .for_each(|set| set.clear());
        engine.len = 0;
        Ok(())
    }

    // == Inspection ==
    /// Returns true if `key` is cached. Does not touch recency.
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        Ok(self.peek_entry(key)?.is_some())
    }

    /// Returns the entry for `key` with its metadata. Does not touch recency.
    pub fn peek_entry(&self, key: &K) -> Result<Option<&CacheEntry<K, V>>> {
        let engine = self.engine()?;
        ensure_present(key, "peek_entry")?;
        Ok(engine.existing_set_for(key).and_then(|set| set.peek(key)))
    }

    /// Index of the set `key` routes to.
    pub fn set_index_of(&self, key: &K) -> Result<usize> {
        let engine = self.engine()?;
        ensure_present(key, "set_index_of")?;
        Ok(engine.index_of(key))
    }

    /// Number of entries in set `index`; zero for a set not yet materialized.
    pub fn set_len(&self, index: usize) -> Result<usize> {
        let engine = self.engine()?;
        match engine.sets.get(index) {
            Some(set) => Ok(set.as_ref().map_or(0, |set| set.len())),
            None => Err(CacheError::InvalidArgument(format!(
                "set index {} out of range 0..{}",
                index,
                engine.sets.len()
            ))),
        }
    }

    /// Frozen configuration of an initialized cache.
    pub fn resolved_config(&self) -> Result<&ResolvedConfig> {
        Ok(&self.engine()?.resolved)
    }

    pub fn set_count(&self) -> Result<usize> {
        Ok(self.engine()?.resolved.set_count)
    }

    pub fn materialized_sets(&self) -> usize {
        self.engine
            .as_ref()
            .map_or(0, |engine| engine.sets.iter().flatten().count())
    }

    /// Number of cached entries; zero before initialization.
    pub fn len(&self) -> usize {
        self.engine.as_ref().map_or(0, |engine| engine.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }

    fn engine(&self) -> Result<&Engine<K, V>> {
        self.engine.as_ref().ok_or(CacheError::NotInitialized)
    }
}

impl<K: CacheKey, V> Default for SetAssociativeCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_present<K: CacheKey>(key: &K, operation: &str) -> Result<()> {
    if key.is_absent() {
        return Err(CacheError::InvalidArgument(format!(
            "{} called with an absent key",
            operation
        )));
    }
    Ok(())
}
