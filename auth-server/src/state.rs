use crate::{
    auth::{jwt::TokenCodec, password::PasswordHasher, refresh::RefreshTokenStore},
    cache::{create_cache, Cache, CacheBackend},
    config::Settings,
    directory::{memory::InMemoryDirectory, ClientDirectory, UserDirectory},
};
use log::{error, info, warn};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub cache: Arc<Cache>,
    pub users: Arc<dyn UserDirectory>,
    pub clients: Arc<dyn ClientDirectory>,
    pub codec: Arc<TokenCodec>,
    pub passwords: PasswordHasher,
    pub refresh_tokens: RefreshTokenStore,
}

impl AppState {
    /// Build the state from settings: cache, directory and token codec
    pub async fn new(settings: Settings) -> Result<Self, std::io::Error> {
        let cache = create_cache(&settings.cache)
            .await
            .map_err(|e| std::io::Error::other(format!("Failed to create cache: {}", e)))?;

        let passwords = PasswordHasher::new(settings.password.bcrypt_cost).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid bcrypt cost {}: {}", settings.password.bcrypt_cost, e),
            )
        })?;
        info!("Password hashing uses bcrypt cost {}", passwords.cost());

        let directory = match settings.directory.path.as_deref() {
            Some(path) => InMemoryDirectory::load(path, &passwords)
                .await
                .map_err(std::io::Error::other)?,
            None => {
                warn!("No directory file configured, every login will be rejected");
                InMemoryDirectory::new()
            }
        };

        Ok(Self::with_parts(settings, cache, passwords, Arc::new(directory)))
    }

    /// Assemble the state from already constructed parts
    pub fn with_parts<D>(
        settings: Settings,
        cache: Cache,
        passwords: PasswordHasher,
        directory: Arc<D>,
    ) -> Self
    where
        D: UserDirectory + ClientDirectory + 'static,
    {
        let codec = TokenCodec::from_config(&settings.jwt);
        if !codec.is_configured() {
            error!("JWT signing secret is not configured, token requests will fail");
        }

        let cache = Arc::new(cache);
        Self {
            settings: Arc::new(settings),
            refresh_tokens: RefreshTokenStore::new(cache.clone()),
            cache,
            users: directory.clone(),
            clients: directory,
            codec: Arc::new(codec),
            passwords,
        }
    }

    /// Check if all components are healthy
    pub async fn health_check(&self) -> Result<(), String> {
        self.cache.health_check().await
    }
}
