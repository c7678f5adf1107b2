use crate::cache::CacheBackend;
use crate::errors::{ApiError, ErrorResponse};
use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

const PING_KEY: &str = "ping:timestamp";
const PING_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    message: String,
}

/// Authenticated ping that also exercises a cache write
#[utoipa::path(
    get,
    path = "/api/ping",
    tag = HEALTH_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Pong", body = PingResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 500, description = "Cache unavailable", body = ErrorResponse)
    )
)]
pub(crate) async fn ping_handler(State(state): State<AppState>) -> Result<Json<PingResponse>, ApiError> {
    state
        .cache
        .set(PING_KEY, &Utc::now().to_rfc3339(), PING_TTL)
        .await?;

    Ok(Json(PingResponse {
        message: "pong".to_string(),
    }))
}
