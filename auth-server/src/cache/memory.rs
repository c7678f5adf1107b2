use super::{CacheBackend, CacheError};
use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;
use serde::{de::DeserializeOwned, Serialize};
use std::time::{Duration, Instant};

/// Serialized value together with the TTL it was stored with
#[derive(Clone)]
struct Entry {
    payload: String,
    ttl: Option<Duration>,
}

/// Expires every entry after the TTL given to its own `set` call
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

#[derive(Clone)]
pub struct InMemoryCache {
    cache: MokaCache<String, Entry>,
}

impl InMemoryCache {
    /// Initialize a new in-memory cache instance bounded to `capacity_mib` MiB of payload
    pub fn new(capacity_mib: usize) -> Result<Self, String> {
        let max_capacity_bytes: u64 = capacity_mib
            .checked_mul(1024 * 1024)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| format!("Cache capacity of {capacity_mib} MiB overflows"))?;

        let cache = MokaCache::builder()
            .expire_after(PerEntryTtl)
            .weigher(|_key, value: &Entry| -> u32 {
                value.payload.len().try_into().unwrap_or(u32::MAX)
            })
            .max_capacity(max_capacity_bytes)
            .build();

        Ok(Self { cache })
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let entry = Entry {
            payload: serde_json::to_string(value)?,
            ttl: (!ttl.is_zero()).then_some(ttl),
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError> {
        if let Some(entry) = self.cache.get(key).await {
            serde_json::from_str(&entry.payload)
                .map_err(|e| CacheError::Deserialization(e.to_string()))
                .map(Some)
        } else {
            Ok(None)
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.remove(key).await;
        Ok(())
    }
}
