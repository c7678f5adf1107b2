use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod memory;
pub mod null;
pub mod redis;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to serialize value: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to parse value: {0}")]
    Deserialization(String),
    #[error("Redis error: {0}")]
    Redis(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Cache trait defining the interface for all cache implementations.
///
/// A read of an absent or expired key is `Ok(None)`, never an error, so callers
/// can tell a miss apart from a backend failure. A stored value that no longer
/// decodes into `T` is reported as [`CacheError::Deserialization`].
///
/// Implementations of this trait should be thread-safe (Send + Sync)
/// and cloneable to support sharing across multiple handlers.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    /// Store a value under `key` for `ttl`. A zero TTL stores the value without expiry.
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Retrieve a value from the cache
    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError>;

    /// Performs a deep health check on the cache backend
    ///
    /// For Redis, this will ping the server. The in-memory and null caches
    /// are always healthy.
    async fn health_check(&self) -> Result<(), String>;

    /// Delete a value from the cache
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache implementation that provides a uniform interface regardless of backend.
///
/// The concrete implementation is chosen at runtime based on the application
/// configuration.
#[derive(Clone)]
pub enum Cache {
    /// In-memory cache implementation using Moka
    InMemory(memory::InMemoryCache),
    /// Redis-based cache implementation
    Redis(redis::RedisCache),
    /// No-op cache implementation that doesn't actually cache anything
    Null(null::NullCache),
}

#[async_trait::async_trait]
impl CacheBackend for Cache {
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        match self {
            Self::InMemory(cache) => cache.set(key, value, ttl).await,
            Self::Redis(cache) => cache.set(key, value, ttl).await,
            Self::Null(cache) => cache.set(key, value, ttl).await,
        }
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError> {
        match self {
            Self::InMemory(cache) => cache.get(key).await,
            Self::Redis(cache) => cache.get(key).await,
            Self::Null(cache) => cache.get(key).await,
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        match self {
            Self::InMemory(cache) => cache.health_check().await,
            Self::Redis(cache) => cache.health_check().await,
            Self::Null(cache) => cache.health_check().await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            Self::InMemory(cache) => cache.delete(key).await,
            Self::Redis(cache) => cache.delete(key).await,
            Self::Null(cache) => cache.delete(key).await,
        }
    }
}

/// Creates the cache implementation selected by the configuration.
///
/// The Redis backend is pinged once here, so a bad URL or an unreachable
/// server fails startup instead of the first token request.
pub async fn create_cache(config: &crate::config::CacheConfig) -> Result<Cache, CacheError> {
    match config.store {
        crate::config::CacheStore::InMemory => {
            let cache = memory::InMemoryCache::new(config.memory.capacity)
                .map_err(CacheError::Config)?;
            Ok(Cache::InMemory(cache))
        }
        crate::config::CacheStore::Redis => {
            let url = match config.redis.url.as_deref() {
                Some(url) if !url.is_empty() => url,
                _ => {
                    return Err(CacheError::Config(
                        "Redis URL is required for Redis cache".to_string(),
                    ));
                }
            };
            let cache = redis::RedisCache::new(url)
                .await
                .map_err(CacheError::Config)?;
            Ok(Cache::Redis(cache))
        }
        crate::config::CacheStore::None => Ok(Cache::Null(null::NullCache::new())),
    }
}
