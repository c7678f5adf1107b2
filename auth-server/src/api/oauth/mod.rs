//! OAuth 2.0 token endpoint.
//!
//! ## Supported grants
//! - Resource Owner Password Credentials (RFC 6749 Section 4.3)
//! - Client Credentials (RFC 6749 Section 4.4)
//! - Refresh Token (RFC 6749 Section 6)
//!
//! Clients authenticate with HTTP Basic. Access tokens are HS256 JWTs and
//! refresh tokens are opaque values stored in the cache backend.

pub mod handlers;
pub mod models;

use crate::state::AppState;
use axum::{routing::post, Router};

/// Creates OAuth 2.0 routes
pub fn router() -> Router<AppState> {
    Router::new().route("/api/oauth/token", post(handlers::token_handler))
}
