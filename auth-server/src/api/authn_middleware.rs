use crate::errors::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::warn;

const BEARER_PREFIX: &str = "bearer ";

/// Verify `Authorization: Bearer <token>` and expose the claims to handlers
pub(super) async fn authentication_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = match request.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header,
        None => {
            warn!("Missing Authorization header");
            return ApiError::MissingToken.into_response();
        }
    };

    // Scheme is case-insensitive
    let token = match auth_header.to_str() {
        Ok(header_str)
            if header_str.len() > BEARER_PREFIX.len()
                && header_str.is_char_boundary(BEARER_PREFIX.len())
                && header_str[..BEARER_PREFIX.len()].eq_ignore_ascii_case(BEARER_PREFIX) =>
        {
            header_str[BEARER_PREFIX.len()..].trim().to_string()
        }
        Ok(_) => {
            warn!("Invalid Authorization header format, missing 'Bearer ' prefix");
            return ApiError::MalformedBearer.into_response();
        }
        Err(e) => {
            warn!("Failed to parse Authorization header to string: {}", e);
            return ApiError::MalformedBearer.into_response();
        }
    };

    let claims = match state.codec.verify_access_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Authentication failed: {}", e);
            return ApiError::from(e).into_response();
        }
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{AccessTokenClaims, TokenCodec};
    use crate::models::User;
    use crate::test_utils::TestFixture;
    use axum::routing::get;
    use axum::{Extension, Router};
    use http::StatusCode;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const TEST_ROUTE: &str = "/test";

    /// Helper function to set up a mock app with authentication middleware
    async fn setup_authn_mock_app() -> (Router, Arc<TokenCodec>) {
        let fixture = TestFixture::new().await;
        let state = fixture.state.clone();

        let app = Router::new()
            .route(
                TEST_ROUTE,
                get(|Extension(claims): Extension<AccessTokenClaims>| async move {
                    format!("Authenticated as {}", claims.sub)
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            ))
            .with_state(state.clone());
        (app, state.codec)
    }

    /// Helper function to build a request with optional authorization header
    async fn send_request(app: &Router, auth_header: Option<&str>) -> (StatusCode, String) {
        let mut request_builder = Request::builder().uri(TEST_ROUTE);

        if let Some(auth) = auth_header {
            request_builder = request_builder.header("Authorization", auth);
        }

        let request = request_builder
            .body(Body::empty())
            .expect("Failed to build request");

        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        let body = String::from_utf8(body_bytes.to_vec())
            .expect("Failed to convert response body to string");

        (status, body)
    }

    fn issue(codec: &TokenCodec, id: i64) -> String {
        let user = User {
            id,
            ..Default::default()
        };
        codec
            .issue_access_token(&user, Duration::from_secs(60))
            .unwrap()
            .0
    }

    #[tokio::test]
    async fn test_authentication_middleware() {
        let (app, codec) = setup_authn_mock_app().await;
        let token = issue(&codec, 2);

        let (status, body) = send_request(&app, Some(&format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Authenticated as 2");

        let (status, _) = send_request(&app, Some(&format!("bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let (app, _) = setup_authn_mock_app().await;
        let (status, body) = send_request(&app, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"missing token"}"#);
    }

    #[tokio::test]
    async fn test_invalid_authorization_format() {
        let (app, codec) = setup_authn_mock_app().await;
        let token = issue(&codec, 2);

        for header in ["BadHeader".to_string(), format!("Basic {token}"), "Bearer".to_string()] {
            let (status, body) = send_request(&app, Some(&header)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, r#"{"message":"invalid authorization header"}"#);
        }
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let (app, _) = setup_authn_mock_app().await;
        let foreign = issue(&TokenCodec::new(Some("another-secret")), 2);

        for header in ["Bearer invalid".to_string(), format!("Bearer {foreign}")] {
            let (status, body) = send_request(&app, Some(&header)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, r#"{"message":"invalid token"}"#);
        }
    }
}
