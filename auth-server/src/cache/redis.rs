use super::{CacheBackend, CacheError};
use async_trait::async_trait;
use log::error;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

#[derive(Clone)]
pub struct RedisCache {
    conn_manager: ConnectionManager,
}

impl RedisCache {
    /// Initialize a new Redis cache instance
    pub async fn new(redis_url: &str) -> Result<Self, String> {
        let client = Client::open(redis_url)
            .map_err(|err| format!("Failed to connect to Redis: {}", err))?;

        let conn_manager = ConnectionManager::new(client)
            .await
            .map_err(|err| format!("Failed to create Redis connection manager: {}", err))?;

        let mut conn = conn_manager.clone();
        if let Err(err) = redis::cmd("PING").query_async::<String>(&mut conn).await {
            return Err(format!("Failed to ping Redis: {}", err));
        }

        Ok(Self { conn_manager })
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let serialized = serde_json::to_string(value)?;
        let mut conn = self.conn_manager.clone();

        // PSETEX keeps millisecond precision; a zero TTL means no expiry
        let ttl_millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let result = if ttl_millis == 0 {
            conn.set::<_, _, ()>(key, serialized).await
        } else {
            conn.pset_ex::<_, _, ()>(key, serialized, ttl_millis).await
        };

        result.map_err(|err| {
            error!("Redis error while setting key {}: {}", key, err);
            CacheError::Redis(err.to_string())
        })
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError> {
        let mut conn = self.conn_manager.clone();

        let result: Option<String> = conn.get(key).await.map_err(|err| {
            error!("Redis error while getting key {}: {}", key, err);
            CacheError::Redis(err.to_string())
        })?;

        match result {
            Some(value) => serde_json::from_str(&value)
                .map_err(|e| CacheError::Deserialization(e.to_string()))
                .map(Some),
            None => Ok(None),
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        let mut conn = self.conn_manager.clone();
        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(_) => Ok(()),
            Err(err) => Err(format!("Redis health check failed: {}", err)),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn_manager.clone();

        conn.del::<_, ()>(key).await.map_err(|err| {
            error!("Redis error while deleting key {}: {}", key, err);
            CacheError::Redis(err.to_string())
        })
    }
}
