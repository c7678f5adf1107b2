use crate::auth::jwt::AccessTokenClaims;
use crate::errors::{ApiError, ErrorResponse};
use crate::models::UserResponse;
use crate::openapi::USERS_TAG;
use crate::state::AppState;
use axum::{extract::State, Extension, Json};

/// Returns the user the access token was issued for
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = USERS_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 500, description = "User lookup failed", body = ErrorResponse)
    )
)]
pub(crate) async fn me_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<AccessTokenClaims>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .get_user_by_id(claims.user_id)
        .await
        .map_err(|e| {
            ApiError::DependencyFailure(format!("failed to load user {}: {}", claims.user_id, e))
        })?;

    Ok(Json(user.into()))
}
