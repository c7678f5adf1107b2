use super::{ClientDirectory, DirectoryError, UserDirectory};
use crate::auth::password::PasswordHasher;
use crate::models::{OAuthClient, User};
use async_trait::async_trait;
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Directory held entirely in memory, optionally seeded from a JSON file
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    users: HashMap<i64, User>,
    clients: HashMap<String, OAuthClient>,
}

/// Seed file layout
#[derive(Debug, Deserialize)]
struct Seed {
    #[serde(default)]
    users: Vec<SeedUser>,
    #[serde(default)]
    clients: Vec<OAuthClient>,
}

/// A seeded user carries either a bcrypt hash or a plaintext password
#[derive(Debug, Deserialize)]
struct SeedUser {
    id: i64,
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password_hash: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    is_admin: bool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    /// Add or replace a client
    pub fn with_client(mut self, client: OAuthClient) -> Self {
        self.clients.insert(client.client_id.clone(), client);
        self
    }

    /// Load users and clients from a JSON seed file.
    ///
    /// Plaintext passwords in the seed are hashed with `hasher` before they
    /// are kept in memory.
    pub async fn load(path: &Path, hasher: &PasswordHasher) -> Result<Self, String> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read directory file {}: {}", path.display(), e))?;
        let seed: Seed = serde_json::from_slice(&raw)
            .map_err(|e| format!("Failed to parse directory file {}: {}", path.display(), e))?;

        let mut directory = Self::new();
        for seed_user in seed.users {
            let password_hash = match (seed_user.password_hash, seed_user.password) {
                (Some(hash), _) => hash,
                (None, Some(password)) => {
                    warn!(
                        "User '{}' is seeded with a plaintext password, hashing it on load",
                        seed_user.name
                    );
                    hasher
                        .hash_password(&password)
                        .await
                        .map_err(|e| format!("Failed to hash password for '{}': {}", seed_user.name, e))?
                }
                (None, None) => {
                    return Err(format!(
                        "User '{}' has neither password_hash nor password",
                        seed_user.name
                    ));
                }
            };
            directory = directory.with_user(User {
                id: seed_user.id,
                name: seed_user.name,
                email: seed_user.email,
                password_hash,
                is_admin: seed_user.is_admin,
            });
        }
        for client in seed.clients {
            if !directory.users.contains_key(&client.user_id) {
                warn!(
                    "Client '{}' is owned by unknown user {}",
                    client.client_id, client.user_id
                );
            }
            directory = directory.with_client(client);
        }

        info!(
            "Loaded {} users and {} clients from {}",
            directory.users.len(),
            directory.clients.len(),
            path.display()
        );
        Ok(directory)
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn get_user_by_name(&self, name: &str) -> Result<User, DirectoryError> {
        self.users
            .values()
            .find(|user| user.name == name)
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, DirectoryError> {
        self.users.get(&id).cloned().ok_or(DirectoryError::NotFound)
    }
}

#[async_trait]
impl ClientDirectory for InMemoryDirectory {
    async fn get_client_by_client_id(
        &self,
        client_id: &str,
    ) -> Result<OAuthClient, DirectoryError> {
        self.clients
            .get(client_id)
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }
}
