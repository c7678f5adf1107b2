use super::verify_user_credentials;
use crate::errors::{ApiError, ErrorResponse};
use crate::headers::presets;
use crate::openapi::AUTH_TAG;
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Username and password login form
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Password
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed access token
    pub access_token: String,
    /// Expiry of the access token (RFC 3339)
    pub expires_at: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn login_handler(
    State(state): State<AppState>,
    form: Result<Form<LoginRequest>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(request) = form.map_err(|e| {
        debug!("Rejected login request body: {}", e);
        ApiError::MalformedRequest
    })?;
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::MalformedRequest);
    }

    let user = verify_user_credentials(&state, &request.username, &request.password).await?;
    let (access_token, claims) = state
        .codec
        .issue_access_token(&user, state.settings.access_token_ttl())?;

    let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or_else(|| {
        ApiError::DependencyFailure(format!("token expiry {} is out of range", claims.exp))
    })?;

    info!("User {} logged in", user.id);
    let mut response = Json(LoginResponse {
        access_token,
        expires_at,
    })
    .into_response();
    presets::no_store().apply(&mut response);
    Ok(response)
}
