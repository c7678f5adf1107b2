use crate::auth::client::ClientAuthError;
use crate::auth::jwt::TokenError;
use crate::auth::password::CredentialError;
use crate::auth::refresh::RefreshTokenError;
use crate::cache::CacheError;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Message returned for every 5xx response; details stay in the server log
const INTERNAL_MESSAGE: &str = "internal server error";

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ErrorResponse {
    /// Human readable error message
    pub message: String,
}

/// Errors surfaced at the request boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body could not be bound")]
    MalformedRequest,
    #[error("malformed Basic authorization header")]
    MalformedAuthorization,
    #[error("authorization header is not a Bearer token")]
    MalformedBearer,
    #[error("user credentials rejected")]
    InvalidCredentials,
    #[error("client credentials rejected")]
    InvalidClient,
    #[error("grant type not allowed for client")]
    UnauthorizedGrant,
    #[error("grant type not supported")]
    UnsupportedGrant,
    #[error("access token expired or invalid")]
    TokenExpiredOrInvalid,
    #[error("access token missing")]
    MissingToken,
    #[error("refresh token not found")]
    RefreshTokenNotFound,
    #[error("configuration error: {0}")]
    ConfigurationError(String),
    #[error("dependency failure: {0}")]
    DependencyFailure(String),
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),
}

impl ApiError {
    /// Status code and client-facing message for each error
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MalformedRequest => (StatusCode::BAD_REQUEST, "invalid request payload"),
            Self::MalformedAuthorization => {
                (StatusCode::BAD_REQUEST, "invalid authorization header")
            }
            Self::MalformedBearer => (StatusCode::UNAUTHORIZED, "invalid authorization header"),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid credentials"),
            Self::InvalidClient => (StatusCode::UNAUTHORIZED, "invalid client credentials"),
            Self::UnauthorizedGrant => (StatusCode::BAD_REQUEST, "unauthorized grant_type"),
            Self::UnsupportedGrant => (StatusCode::BAD_REQUEST, "unsupported grant_type"),
            Self::TokenExpiredOrInvalid => (StatusCode::UNAUTHORIZED, "invalid token"),
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "missing token"),
            Self::RefreshTokenNotFound => (StatusCode::UNAUTHORIZED, "invalid refresh token"),
            Self::ConfigurationError(_)
            | Self::DependencyFailure(_)
            | Self::IntegrityViolation(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = self.status_and_message();
        if status_code.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = ErrorResponse {
            message: message.to_string(),
        };
        (status_code, Json(body)).into_response()
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Hashing(e) => Self::DependencyFailure(e),
            CredentialError::Mismatch | CredentialError::InvalidCredentials => {
                Self::InvalidCredentials
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::SigningUnavailable => {
                Self::ConfigurationError("JWT signing secret is not configured".to_string())
            }
            TokenError::InvalidToken => Self::TokenExpiredOrInvalid,
            e @ TokenError::OwnershipMismatch { .. } => Self::IntegrityViolation(e.to_string()),
            TokenError::Encoding(e) => Self::DependencyFailure(e),
        }
    }
}

impl From<RefreshTokenError> for ApiError {
    fn from(err: RefreshTokenError) -> Self {
        match err {
            RefreshTokenError::NotFoundOrExpired => Self::RefreshTokenNotFound,
            RefreshTokenError::Corrupt(e) => {
                warn!("Rejecting corrupt refresh token record: {}", e);
                Self::RefreshTokenNotFound
            }
            RefreshTokenError::StoreFailure(e) => Self::DependencyFailure(e),
        }
    }
}

impl From<ClientAuthError> for ApiError {
    fn from(err: ClientAuthError) -> Self {
        match err {
            ClientAuthError::MalformedHeader => Self::MalformedAuthorization,
            ClientAuthError::InvalidClient => Self::InvalidClient,
            ClientAuthError::GrantNotAllowed { .. } => Self::UnauthorizedGrant,
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        Self::DependencyFailure(err.to_string())
    }
}
