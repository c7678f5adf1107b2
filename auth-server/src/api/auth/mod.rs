pub mod login;

use crate::directory::DirectoryError;
use crate::errors::ApiError;
use crate::models::User;
use crate::state::AppState;
use axum::{routing::post, Router};
use log::{error, warn};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login::login_handler))
}

/// Resolve a user by name and check the password.
///
/// Unknown users, directory failures and wrong passwords all come back as
/// [`ApiError::InvalidCredentials`] after the same amount of bcrypt work.
pub(crate) async fn verify_user_credentials(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<User, ApiError> {
    let user = match state.users.get_user_by_name(username).await {
        Ok(user) => user,
        Err(DirectoryError::NotFound) => {
            warn!("Authentication failed: unknown user '{}'", username);
            return Err(state.passwords.reject_unknown_user(password).await.into());
        }
        Err(e) => {
            error!("User lookup for '{}' failed: {}", username, e);
            return Err(state.passwords.reject_unknown_user(password).await.into());
        }
    };

    if let Err(e) = state.passwords.authenticate_user(&user, password).await {
        warn!("Authentication failed for user {}: wrong password", user.id);
        return Err(e.into());
    }

    Ok(user)
}
