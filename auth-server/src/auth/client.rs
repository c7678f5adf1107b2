//! OAuth2 client authentication through HTTP Basic credentials.

use crate::directory::{ClientDirectory, DirectoryError};
use crate::models::{GrantType, OAuthClient};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{error, warn};
use subtle::ConstantTimeEq;
use thiserror::Error;

const BASIC_PREFIX: &str = "Basic ";

#[derive(Debug, Error, PartialEq)]
pub enum ClientAuthError {
    #[error("Malformed Basic authorization header")]
    MalformedHeader,
    #[error("Invalid client credentials")]
    InvalidClient,
    #[error("Client '{client_id}' may not use grant type '{grant_type}'")]
    GrantNotAllowed {
        client_id: String,
        grant_type: String,
    },
}

/// Client id and secret taken from an `Authorization: Basic` header
#[derive(Debug, Clone, PartialEq)]
pub struct BasicCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Parse `Basic base64(client_id:client_secret)`.
///
/// The split happens on the first `:`, so secrets may contain colons.
pub fn parse_basic_credentials(header: &str) -> Result<BasicCredentials, ClientAuthError> {
    let encoded = header
        .strip_prefix(BASIC_PREFIX)
        .ok_or(ClientAuthError::MalformedHeader)?;
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| ClientAuthError::MalformedHeader)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ClientAuthError::MalformedHeader)?;

    let (client_id, client_secret) = decoded
        .split_once(':')
        .ok_or(ClientAuthError::MalformedHeader)?;

    Ok(BasicCredentials {
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
    })
}

/// Resolve a client and check its secret
pub async fn authenticate_client(
    clients: &dyn ClientDirectory,
    client_id: &str,
    client_secret: &str,
) -> Result<OAuthClient, ClientAuthError> {
    let client = match clients.get_client_by_client_id(client_id).await {
        Ok(client) => client,
        Err(DirectoryError::NotFound) => {
            warn!("Client authentication failed: unknown client '{}'", client_id);
            return Err(ClientAuthError::InvalidClient);
        }
        Err(e) => {
            error!("Client lookup for '{}' failed: {}", client_id, e);
            return Err(ClientAuthError::InvalidClient);
        }
    };

    let matches: bool = client
        .client_secret
        .as_bytes()
        .ct_eq(client_secret.as_bytes())
        .into();
    if !matches {
        warn!("Client authentication failed: bad secret for '{}'", client_id);
        return Err(ClientAuthError::InvalidClient);
    }

    Ok(client)
}

/// Check the client's grant allow-list. `refresh_token` is always permitted.
pub fn check_grant_allowed(client: &OAuthClient, grant_type: &str) -> Result<(), ClientAuthError> {
    if grant_type == GrantType::RefreshToken.as_str()
        || client.grant_types.iter().any(|g| g == grant_type)
    {
        return Ok(());
    }

    Err(ClientAuthError::GrantNotAllowed {
        client_id: client.client_id.clone(),
        grant_type: grant_type.to_string(),
    })
}
