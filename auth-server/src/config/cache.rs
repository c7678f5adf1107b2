use confique::Config;
use serde::Deserialize;

/// Specifies which cache store implementation to use
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStore {
    #[default]
    InMemory,
    Redis,
    None,
}

/// Configuration for the caching subsystem
#[derive(Debug, Config, Clone)]
pub struct CacheConfig {
    /// Cache store type: "in-memory" (default), "redis" or "none"
    #[config(env = "AUTH_CACHE_STORE", default = "in-memory")]
    pub store: CacheStore,

    /// In-memory cache specific configuration
    #[config(nested)]
    pub memory: InMemoryConfig,

    /// Redis cache specific configuration
    #[config(nested)]
    pub redis: RedisConfig,
}

/// In-memory cache configuration options
#[derive(Debug, Config, Clone)]
pub struct InMemoryConfig {
    /// Maximum capacity in MiB (default: 128 MiB)
    #[config(env = "AUTH_CACHE_MEMORY_CAPACITY", default = 128)]
    pub capacity: usize,
}

/// Redis cache configuration options
#[derive(Debug, Config, Clone)]
pub struct RedisConfig {
    /// Redis connection string
    #[config(env = "AUTH_CACHE_REDIS_URL")]
    pub url: Option<String>,
}
