mod authn_middleware;
pub(crate) mod auth;
pub(crate) mod health;
pub(crate) mod oauth;
pub(crate) mod ping;
pub(crate) mod users;

use crate::api::authn_middleware::authentication_middleware;
use crate::state::AppState;
use axum::{middleware, routing::get, Router};

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(oauth::router())
        .merge(auth::router())
        .merge(protected_routes(state))
}

/// Creates a router for routes that require a bearer access token
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(ping::ping_handler))
        .route("/api/users/me", get(users::me_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestFixture;
    use http::StatusCode;

    #[tokio::test]
    async fn test_unknown_route_is_not_authenticated() {
        let fixture = TestFixture::new().await;
        fixture
            .get("/api/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
