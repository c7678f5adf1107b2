use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// An end user as read from the directory
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct User {
    /// Numeric user identifier
    pub id: i64,
    /// Unique login name
    pub name: String,
    /// User's email address
    #[serde(default)]
    pub email: String,
    /// bcrypt hash of the user's password
    pub password_hash: String,
    /// Whether the user holds administrative privileges
    #[serde(default)]
    pub is_admin: bool,
}

/// A registered OAuth2 client application
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OAuthClient {
    /// Public client identifier
    pub client_id: String,
    /// Shared secret presented through HTTP Basic authentication
    pub client_secret: String,
    /// Id of the user owning this client
    pub user_id: i64,
    /// Grant types this client may use at the token endpoint
    #[serde(default)]
    pub grant_types: Vec<String>,
}

/// Public view of a user, without credential material
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// Grant types understood by the token endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    Password,
    ClientCredentials,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::ClientCredentials => "client_credentials",
            Self::RefreshToken => "refresh_token",
        }
    }
}

/// Returned when a grant type string names no supported grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedGrantType(pub String);

impl FromStr for GrantType {
    type Err = UnsupportedGrantType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(Self::Password),
            "client_credentials" => Ok(Self::ClientCredentials),
            "refresh_token" => Ok(Self::RefreshToken),
            other => Err(UnsupportedGrantType(other.to_string())),
        }
    }
}
