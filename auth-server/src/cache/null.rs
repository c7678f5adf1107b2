use super::{CacheBackend, CacheError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// NullCache is a cache implementation that stores nothing.
/// Every read is a miss and every write fails, so nothing is ever handed out
/// on the assumption that it was stored.
#[derive(Clone, Debug)]
pub struct NullCache;

impl NullCache {
    /// Create a new NullCache instance
    pub fn new() -> Self {
        NullCache
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn set<T: Serialize + Send + Sync>(
        &self,
        _key: &str,
        _value: &T,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::Config("no cache backend configured".to_string()))
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        _key: &str,
    ) -> Result<Option<T>, CacheError> {
        Ok(None)
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_operations() {
        let cache = NullCache::new();

        assert!(matches!(
            cache
                .set("test_key", &"value", Duration::from_secs(60))
                .await,
            Err(CacheError::Config(_))
        ));

        let result: Option<String> = cache.get("test_key").await.unwrap();
        assert!(result.is_none());

        assert!(cache.delete("test_key").await.is_ok());
    }

    #[tokio::test]
    async fn test_health_check() {
        let cache = NullCache::new();
        let result = cache.health_check().await;
        assert!(result.is_ok(), "health check failed: {:?}", result);
    }
}
