//! Read-only lookups of user and client records.
//!
//! Record management lives outside this service; the token endpoints only
//! need to resolve users by name or id and clients by their public id.

use crate::models::{OAuthClient, User};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

/// Errors returned by directory lookups
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Record not found")]
    NotFound,
    #[error("Directory backend error: {0}")]
    Backend(String),
}

/// Lookup of user records
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by login name
    async fn get_user_by_name(&self, name: &str) -> Result<User, DirectoryError>;

    /// Find a user by numeric id
    async fn get_user_by_id(&self, id: i64) -> Result<User, DirectoryError>;
}

/// Lookup of OAuth2 client records
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Find a client by its public client id
    async fn get_client_by_client_id(&self, client_id: &str)
        -> Result<OAuthClient, DirectoryError>;
}
