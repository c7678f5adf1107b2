use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::warn;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Basic health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Health {
    status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cache_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip)]
    status_code: StatusCode,
}

impl Health {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            cache_status: None,
            error: None,
            status_code: StatusCode::OK,
        }
    }
}

impl IntoResponse for Health {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

/// Basic health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = Health)
    )
)]
pub(crate) async fn health_check() -> Health {
    Health::ok()
}

/// Readiness check handler
#[utoipa::path(
    get,
    path = "/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is ready", body = Health),
        (status = 503, description = "Service is not ready", body = Health)
    )
)]
pub(crate) async fn ready_check(State(state): State<AppState>) -> Health {
    match state.health_check().await {
        Ok(()) => Health {
            cache_status: Some("healthy".to_string()),
            ..Health::ok()
        },
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            Health {
                status: "error".to_string(),
                cache_status: Some("unhealthy".to_string()),
                error: Some("Cache backend is not healthy".to_string()),
                status_code: StatusCode::SERVICE_UNAVAILABLE,
            }
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
}
