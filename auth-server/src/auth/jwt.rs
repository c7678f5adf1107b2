//! Signed access tokens (HS256 JWT).

use crate::config::JwtConfig;
use crate::models::{OAuthClient, User};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors produced by the token codec
#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("No signing secret is configured")]
    SigningUnavailable,
    #[error("Invalid access token")]
    InvalidToken,
    #[error("Client '{client_id}' belongs to user {client_owner}, not user {owner}")]
    OwnershipMismatch {
        client_id: String,
        client_owner: i64,
        owner: i64,
    },
    #[error("Failed to sign access token: {0}")]
    Encoding(String),
}

/// Claims carried by every access token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessTokenClaims {
    /// User id, or the client id for client_credentials tokens
    pub sub: String,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub is_admin: bool,
    /// Issued at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies access tokens with a shared HMAC secret.
///
/// A codec built without a secret stays usable: every issue or verify call
/// returns [`TokenError::SigningUnavailable`].
pub struct TokenCodec {
    keys: Option<SigningKeys>,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: Option<&str>) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|s| SigningKeys {
            encoding: EncodingKey::from_secret(s.as_bytes()),
            decoding: DecodingKey::from_secret(s.as_bytes()),
        });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self { keys, validation }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.as_deref())
    }

    /// Whether a signing secret is configured
    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Issue an access token for a user
    pub fn issue_access_token(
        &self,
        user: &User,
        ttl: Duration,
    ) -> Result<(String, AccessTokenClaims), TokenError> {
        let claims = Self::claims(user.id.to_string(), user.id, None, user.is_admin, ttl)?;
        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    /// Issue an access token for a client acting on behalf of its owner
    pub fn issue_client_access_token(
        &self,
        owner: &User,
        client: &OAuthClient,
        ttl: Duration,
    ) -> Result<(String, AccessTokenClaims), TokenError> {
        if owner.id != client.user_id {
            return Err(TokenError::OwnershipMismatch {
                client_id: client.client_id.clone(),
                client_owner: client.user_id,
                owner: owner.id,
            });
        }

        let claims = Self::claims(
            client.client_id.clone(),
            owner.id,
            Some(client.client_id.clone()),
            owner.is_admin,
            ttl,
        )?;
        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    /// Verify signature, algorithm and expiry, returning the claims
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::SigningUnavailable)?;

        decode::<AccessTokenClaims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Access token rejected: {}", e);
                TokenError::InvalidToken
            })
    }

    pub(crate) fn sign(&self, claims: &AccessTokenClaims) -> Result<String, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::SigningUnavailable)?;
        encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn claims(
        sub: String,
        user_id: i64,
        client_id: Option<String>,
        is_admin: bool,
        ttl: Duration,
    ) -> Result<AccessTokenClaims, TokenError> {
        let iat = Utc::now().timestamp();
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| iat.checked_add(secs))
            .ok_or_else(|| {
                TokenError::Encoding(format!("access token TTL of {}s is out of range", ttl.as_secs()))
            })?;

        Ok(AccessTokenClaims {
            sub,
            user_id,
            client_id,
            is_admin,
            iat,
            exp,
        })
    }
}
