//! Password hashing and verification.
//!
//! Uses bcrypt with a work factor fixed at startup. Both hashing and
//! verification are CPU heavy and run on tokio's blocking pool.

use crate::models::User;
use log::debug;
use std::sync::Arc;
use thiserror::Error;

/// Errors produced by the credential verifier
#[derive(Debug, Error, PartialEq)]
pub enum CredentialError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error("Password does not match")]
    Mismatch,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// bcrypt hasher holding the process-wide work factor
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    // compared against when the named user does not exist
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost (4..=31)
    pub fn new(cost: u32) -> Result<Self, CredentialError> {
        let dummy_hash = bcrypt::hash("unknown-user-placeholder", cost)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Work factor used for new hashes
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password into a salted bcrypt string
    pub async fn hash_password(&self, plaintext: &str) -> Result<String, CredentialError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    /// Compare a plaintext password against a stored bcrypt hash
    pub async fn compare_password(&self, hash: &str, plaintext: &str) -> Result<(), CredentialError> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();

        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(|e| {
                debug!("Password verification task failed: {}", e);
                CredentialError::Mismatch
            })?;

        match matched {
            Ok(true) => Ok(()),
            Ok(false) => Err(CredentialError::Mismatch),
            Err(e) => {
                debug!("Stored password hash could not be verified: {}", e);
                Err(CredentialError::Mismatch)
            }
        }
    }

    /// Check a user's password; every failure is reported as `InvalidCredentials`
    pub async fn authenticate_user(&self, user: &User, plaintext: &str) -> Result<(), CredentialError> {
        self.compare_password(&user.password_hash, plaintext)
            .await
            .map_err(|_| CredentialError::InvalidCredentials)
    }

    /// Spend the same bcrypt work as a real check, then fail.
    ///
    /// Called when the requested user does not exist so the response time
    /// matches a wrong-password attempt.
    pub async fn reject_unknown_user(&self, plaintext: &str) -> CredentialError {
        let _ = self.compare_password(&self.dummy_hash, plaintext).await;
        CredentialError::InvalidCredentials
    }
}
