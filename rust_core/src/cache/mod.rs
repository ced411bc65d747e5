//! TTL result caching.
//!
//! `CacheStore` is the raw key-value collaborator; `ResultCache` is the
//! JSON memoization wrapper the engine talks to. Caching is a performance
//! optimization only: every store failure falls through to recomputation,
//! so a dead Redis never takes the engine down with it.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub mod memory;
pub mod redis;

pub use memory::InMemoryCacheStore;
pub use redis::RedisCacheStore;

/// Miss-tolerant TTL key-value store.
///
/// `set` is last-write-wins; entries are idempotent recomputations of the
/// same pure function, so no stronger guarantee is needed.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;

    /// Store name for logging and debugging
    fn store_name(&self) -> &str;
}

/// JSON memoization over a `CacheStore`.
///
/// All methods absorb store errors: a failed read is a miss, a failed write
/// is a log line.
#[derive(Clone)]
pub struct ResultCache {
    store: Option<Arc<dyn CacheStore>>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A cache that never hits; useful for tests and cache-free embedding
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Cache key for a league's power rankings
    pub fn rankings_key(league_id: &str) -> String {
        format!("rankings:{}", league_id)
    }

    /// Cache key for a team's game count in one schedule window
    pub fn schedule_key(season: &str, team_code: &str, start: NaiveDate) -> String {
        format!("schedule:{}:{}:{}", season, team_code.to_lowercase(), start)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.as_ref()?;
        match store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key, error = %e, "cache entry failed to decode; treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, store = store.store_name(), error = %e, "cache read failed; recomputing");
                None
            }
        }
    }

    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "cache value failed to encode; skipping write");
                return;
            }
        };
        if let Err(e) = store.set(key, &raw, ttl).await {
            warn!(key, store = store.store_name(), error = %e, "cache write failed");
        } else {
            debug!(key, ttl_secs = ttl.as_secs(), "cached result");
        }
    }

    pub async fn invalidate(&self, key: &str) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Err(e) = store.delete(key).await {
            warn!(key, store = store.store_name(), error = %e, "cache invalidation failed");
        }
    }
}
