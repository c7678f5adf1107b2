//! Token endpoint: client authentication and grant dispatch

use super::models::{TokenRequest, TokenResponse};
use crate::api::auth::verify_user_credentials;
use crate::auth::client::{authenticate_client, check_grant_allowed, parse_basic_credentials};
use crate::errors::{ApiError, ErrorResponse};
use crate::headers::presets;
use crate::models::{GrantType, OAuthClient, User};
use crate::openapi::OAUTH_TAG;
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use http::HeaderMap;
use log::{debug, error, info, warn};

#[utoipa::path(
    post,
    path = "/api/oauth/token",
    tag = OAUTH_TAG,
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    params(
        ("Authorization" = String, Header, description = "Basic base64(client_id:client_secret)"),
    ),
    responses(
        (status = 200, description = "Tokens issued successfully", body = TokenResponse),
        (status = 400, description = "Malformed request or grant not allowed", body = ErrorResponse),
        (status = 401, description = "Invalid client or user credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn token_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(request) = form.map_err(|e| {
        debug!("Rejected token request body: {}", e);
        ApiError::MalformedRequest
    })?;

    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let credentials = parse_basic_credentials(header)?;

    let client = authenticate_client(
        state.clients.as_ref(),
        &credentials.client_id,
        &credentials.client_secret,
    )
    .await?;

    if let Err(e) = check_grant_allowed(&client, &request.grant_type) {
        warn!("{}", e);
        return Err(e.into());
    }

    let grant_type = request.grant_type.parse::<GrantType>().map_err(|e| {
        warn!("Unsupported grant type '{}' from client '{}'", e.0, client.client_id);
        ApiError::UnsupportedGrant
    })?;

    let token_response = match grant_type {
        GrantType::Password => password_grant(&state, &client, &request).await?,
        GrantType::ClientCredentials => client_credentials_grant(&state, &client).await?,
        GrantType::RefreshToken => refresh_token_grant(&state, &client, &request).await?,
    };

    let mut response = Json(token_response).into_response();
    presets::no_store().apply(&mut response);
    Ok(response)
}

async fn password_grant(
    state: &AppState,
    client: &OAuthClient,
    request: &TokenRequest,
) -> Result<TokenResponse, ApiError> {
    let user = verify_user_credentials(state, &request.username, &request.password).await?;

    let ttl = state.settings.access_token_ttl();
    let (access_token, _) = state.codec.issue_access_token(&user, ttl)?;
    let refresh_token = state
        .refresh_tokens
        .issue_refresh_token(
            user.id,
            &client.client_id,
            user.is_admin,
            state.settings.refresh_token_ttl(),
        )
        .await?;

    info!(
        "Issued password grant tokens for user {} via client '{}'",
        user.id, client.client_id
    );
    Ok(TokenResponse::bearer(
        access_token,
        ttl.as_secs(),
        Some(refresh_token),
    ))
}

async fn client_credentials_grant(
    state: &AppState,
    client: &OAuthClient,
) -> Result<TokenResponse, ApiError> {
    let owner = state
        .users
        .get_user_by_id(client.user_id)
        .await
        .map_err(|e| {
            ApiError::DependencyFailure(format!(
                "failed to retrieve owner {} of client '{}': {}",
                client.user_id, client.client_id, e
            ))
        })?;

    let ttl = state.settings.access_token_ttl();
    let (access_token, _) = state.codec.issue_client_access_token(&owner, client, ttl)?;

    info!(
        "Issued client_credentials token for client '{}' owned by user {}",
        client.client_id, owner.id
    );
    Ok(TokenResponse::bearer(access_token, ttl.as_secs(), None))
}

async fn refresh_token_grant(
    state: &AppState,
    client: &OAuthClient,
    request: &TokenRequest,
) -> Result<TokenResponse, ApiError> {
    let record = state
        .refresh_tokens
        .validate_refresh_token(&request.refresh_token)
        .await?;

    // Tokens are not bound to the presenting client
    if record.client_id != client.client_id {
        warn!(
            "Refresh token issued to client '{}' presented by client '{}'",
            record.client_id, client.client_id
        );
    }

    // The admin flag is not carried over from the refresh token
    let user = User {
        id: record.user_id,
        is_admin: false,
        ..Default::default()
    };
    let ttl = state.settings.access_token_ttl();
    let (access_token, _) = state.codec.issue_access_token(&user, ttl)?;

    let refresh_token = if state.settings.refresh_token.rotate {
        state
            .refresh_tokens
            .rotate_refresh_token(
                &request.refresh_token,
                &record,
                state.settings.refresh_token_ttl(),
            )
            .await
            .inspect_err(|e| error!("Failed to issue rotated refresh token: {}", e))?
    } else {
        request.refresh_token.clone()
    };

    info!(
        "Refreshed access token for user {} via client '{}'",
        record.user_id, client.client_id
    );
    Ok(TokenResponse::bearer(
        access_token,
        ttl.as_secs(),
        Some(refresh_token),
    ))
}
