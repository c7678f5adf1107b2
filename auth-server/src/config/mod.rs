pub(crate) use crate::config::cache::{CacheConfig, CacheStore};
use confique::Config;
use std::path::PathBuf;

pub mod cache;

/// Default location of the optional TOML configuration file
const DEFAULT_CONFIG_FILE: &str = "auth-server.toml";

/// Main configuration structure for the auth server
#[derive(Debug, Config, Clone)]
pub struct Settings {
    /// The port the server will listen to (default: 8080)
    #[config(env = "AUTH_PORT", default = 8080)]
    pub port: u16,

    /// Access token signing configuration
    #[config(nested)]
    pub jwt: JwtConfig,

    /// Refresh token lifetime and rotation
    #[config(nested)]
    pub refresh_token: RefreshTokenConfig,

    /// Password hashing configuration
    #[config(nested)]
    pub password: PasswordConfig,

    /// Cache configuration (refresh token storage)
    #[config(nested)]
    pub cache: CacheConfig,

    /// User and client directory configuration
    #[config(nested)]
    pub directory: DirectoryConfig,
}

/// Access token signing configuration
#[derive(Debug, Config, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA-256 signing secret. Token issuance fails per request while unset.
    #[config(env = "AUTH_JWT_SECRET")]
    pub secret: Option<String>,

    /// Access token TTL in seconds (default: 86400 = 24 hours)
    #[config(env = "AUTH_JWT_ACCESS_TOKEN_TTL", default = 86400)]
    pub access_token_ttl: u64,
}

/// Refresh token configuration
#[derive(Debug, Config, Clone)]
pub struct RefreshTokenConfig {
    /// Refresh token TTL in seconds (default: 2592000 = 30 days)
    #[config(env = "AUTH_REFRESH_TOKEN_TTL", default = 2592000)]
    pub ttl: u64,

    /// Replace the refresh token on every refresh_token grant (default: false)
    #[config(env = "AUTH_REFRESH_TOKEN_ROTATE", default = false)]
    pub rotate: bool,
}

/// Password hashing configuration
#[derive(Debug, Config, Clone)]
pub struct PasswordConfig {
    /// bcrypt work factor, between 4 and 31 (default: 12)
    #[config(env = "AUTH_PASSWORD_BCRYPT_COST", default = 12)]
    pub bcrypt_cost: u32,
}

/// Directory (user and client records) configuration
#[derive(Debug, Config, Clone)]
pub struct DirectoryConfig {
    /// Path to a JSON seed file with users and clients
    #[config(env = "AUTH_DIRECTORY_PATH")]
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Loads the configuration from environment variables and the optional TOML file
    pub fn new() -> Result<Self, String> {
        let file = std::env::var("AUTH_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Settings::builder()
            .env()
            .file(file)
            .load()
            .map_err(|e| e.to_string())
    }

    /// Access token TTL as a duration
    pub fn access_token_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.jwt.access_token_ttl)
    }

    /// Refresh token TTL as a duration
    pub fn refresh_token_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_token.ttl)
    }

    #[cfg(test)]
    pub fn for_test() -> Self {
        Self {
            port: 0, // Let the OS choose a port
            jwt: JwtConfig {
                secret: Some("test-signing-secret".to_string()),
                access_token_ttl: 86400,
            },
            refresh_token: RefreshTokenConfig {
                ttl: 3600,
                rotate: false,
            },
            password: PasswordConfig {
                bcrypt_cost: 4, // bcrypt minimum, keeps tests fast
            },
            cache: CacheConfig {
                store: CacheStore::InMemory,
                memory: cache::InMemoryConfig { capacity: 16 },
                redis: cache::RedisConfig { url: None },
            },
            directory: DirectoryConfig { path: None },
        }
    }
}
