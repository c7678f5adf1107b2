//! Opaque refresh tokens kept in the cache backend.

use crate::cache::{Cache, CacheBackend, CacheError};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use log::{debug, error, warn};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const KEY_PREFIX: &str = "refresh_token:";
const TOKEN_BYTES: usize = 32;

/// Errors that can occur during refresh token operations
#[derive(Debug, Error)]
pub enum RefreshTokenError {
    #[error("Refresh token not found or expired")]
    NotFoundOrExpired,
    #[error("Refresh token record is corrupt: {0}")]
    Corrupt(String),
    #[error("Refresh token store failure: {0}")]
    StoreFailure(String),
}

impl From<CacheError> for RefreshTokenError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Deserialization(e) => Self::Corrupt(e),
            other => Self::StoreFailure(other.to_string()),
        }
    }
}

/// What a refresh token grants, snapshotted at issuance
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RefreshTokenRecord {
    pub user_id: i64,
    pub client_id: String,
    pub is_admin: bool,
}

/// Issues, validates and revokes refresh tokens
pub struct RefreshTokenStore<C: CacheBackend = Cache> {
    cache: Arc<C>,
}

impl<C: CacheBackend> Clone for RefreshTokenStore<C> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<C: CacheBackend> RefreshTokenStore<C> {
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Generate a token and store its record for `ttl`.
    ///
    /// The token is only returned once the record has been written.
    pub async fn issue_refresh_token(
        &self,
        user_id: i64,
        client_id: &str,
        is_admin: bool,
        ttl: Duration,
    ) -> Result<String, RefreshTokenError> {
        let token = generate_token();
        let record = RefreshTokenRecord {
            user_id,
            client_id: client_id.to_string(),
            is_admin,
        };

        self.cache
            .set(&cache_key(&token), &record, ttl)
            .await
            .map_err(|e| {
                error!("Failed to store refresh token for user {}: {}", user_id, e);
                RefreshTokenError::StoreFailure(e.to_string())
            })?;

        debug!(
            "Issued refresh token {} for user {} via client '{}', expires in {}s",
            fingerprint(&token),
            user_id,
            client_id,
            ttl.as_secs()
        );
        Ok(token)
    }

    /// Look up the record behind a refresh token
    pub async fn validate_refresh_token(
        &self,
        token: &str,
    ) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let record: Option<RefreshTokenRecord> =
            self.cache.get(&cache_key(token)).await.map_err(|e| {
                warn!(
                    "Failed to read refresh token {}: {}",
                    fingerprint(token),
                    e
                );
                RefreshTokenError::from(e)
            })?;

        match record {
            Some(record) => {
                debug!(
                    "Validated refresh token {} for user {}",
                    fingerprint(token),
                    record.user_id
                );
                Ok(record)
            }
            None => Err(RefreshTokenError::NotFoundOrExpired),
        }
    }

    /// Delete a refresh token so it can no longer be redeemed
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<(), RefreshTokenError> {
        self.cache
            .delete(&cache_key(token))
            .await
            .map_err(|e| RefreshTokenError::StoreFailure(e.to_string()))?;
        debug!("Revoked refresh token {}", fingerprint(token));
        Ok(())
    }

    /// Replace `token` with a new token carrying the same record.
    ///
    /// The replacement is stored before the old token is deleted, so a failed
    /// write leaves the old token usable. A failed delete is only logged; the
    /// old token then lives until its TTL runs out.
    pub async fn rotate_refresh_token(
        &self,
        token: &str,
        record: &RefreshTokenRecord,
        ttl: Duration,
    ) -> Result<String, RefreshTokenError> {
        let replacement = self
            .issue_refresh_token(record.user_id, &record.client_id, record.is_admin, ttl)
            .await?;

        if let Err(e) = self.revoke_refresh_token(token).await {
            warn!(
                "Failed to revoke rotated refresh token {}: {}",
                fingerprint(token),
                e
            );
        }
        Ok(replacement)
    }
}

fn cache_key(token: &str) -> String {
    format!("{KEY_PREFIX}{token}")
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Short SHA-256 prefix identifying a token in logs
pub(crate) fn fingerprint(token: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(token.as_bytes()));
    digest[..12].to_string()
}
