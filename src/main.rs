//! Set Assoc Cache - console demonstration
//!
//! Builds a cache from the environment, runs a small workload against it and
//! prints what happened.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use set_assoc_cache::{CacheConfig, SetAssociativeCache, StoreOutcome};

/// Number of distinct keys the demo workload writes
const DEMO_KEYS: usize = 2_000;

/// Main entry point for the demonstration.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Initialize the cache
/// 4. Store a batch of keys, re-reading every third one
/// 5. Print a sample lookup and the statistics as JSON
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "set_assoc_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!("Configuration loaded: {:?}", config);

    let mut cache: SetAssociativeCache<String, usize> =
        SetAssociativeCache::initialized(config).context("failed to initialize cache")?;

    let mut evicted = 0usize;
    for i in 0..DEMO_KEYS {
        let key = format!("key-{}", i);
        if let StoreOutcome::Evicted(_) = cache.store(key, i)? {
            evicted += 1;
        }
        if i % 3 == 0 {
            cache.try_get(&format!("key-{}", i / 2))?;
        }
    }
    info!("Workload finished: {} stores, {} evictions", DEMO_KEYS, evicted);

    let probe = "key-0".to_string();
    match cache.try_get(&probe)?.copied() {
        Some(value) => println!("{} -> {} (set {})", probe, value, cache.set_index_of(&probe)?),
        None => println!("{} was evicted", probe),
    }

    let stats = cache.stats();
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("failed to serialize stats")?
    );
    println!("hit rate: {:.2}%", stats.hit_rate() * 100.0);

    Ok(())
}
