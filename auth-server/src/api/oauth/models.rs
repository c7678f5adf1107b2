//! OAuth 2.0 token endpoint request and response structures

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// OAuth 2.0 Token Request (form encoded)
///
/// Client credentials travel in the `Authorization: Basic` header, not in the form.
#[derive(Debug, Deserialize, Serialize, ToSchema, Default)]
pub struct TokenRequest {
    /// OAuth 2.0 grant type - "password", "client_credentials" or "refresh_token"
    #[serde(default)]
    pub grant_type: String,
    /// Username (password grant)
    #[serde(default)]
    pub username: String,
    /// Password (password grant)
    #[serde(default)]
    pub password: String,
    /// Refresh token (refresh_token grant)
    #[serde(default)]
    pub refresh_token: String,
    /// Requested scopes, accepted and ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// OAuth 2.0 Token Response
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TokenResponse {
    /// The access token string
    pub access_token: String,
    /// Token type - always "Bearer"
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
    /// Refresh token, absent for client_credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: u64, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            refresh_token,
        }
    }
}
