//! Redis-backed cache store.
//!
//! A connection is opened per operation from the shared client; callers go
//! through `ResultCache`, which treats any error here as a miss.

use super::CacheStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use std::env;
use std::time::Duration;

pub struct RedisCacheStore {
    client: Client,
}

impl RedisCacheStore {
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).context("invalid redis url")?;
        Ok(Self { client })
    }

    /// Connect using REDIS_URL, defaulting to a local instance
    pub fn from_env() -> Result<Self> {
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        Self::new(&redis_url)
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.client.get_async_connection().await?;
        let value: Option<String> = conn.get(key).await.context("redis GET failed")?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.client.get_async_connection().await?;
        let ttl_secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .context("redis SETEX failed")?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.client.get_async_connection().await?;
        conn.del::<_, ()>(key).await.context("redis DEL failed")?;
        Ok(())
    }

    fn store_name(&self) -> &str {
        "redis"
    }
}
