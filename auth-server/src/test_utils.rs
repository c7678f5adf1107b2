use crate::auth::password::PasswordHasher;
use crate::cache::create_cache;
use crate::config::Settings;
use crate::create_app;
use crate::directory::memory::InMemoryDirectory;
use crate::models::{OAuthClient, User};
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Seeded admin user
pub const ALICE: (&str, &str) = ("alice", "wonderland");
/// Seeded regular user
pub const BOB: (&str, &str) = ("bob", "builder");

/// Test fixture for setting up a complete application with a seeded directory.
///
/// The directory holds two users and three clients:
/// - `alice` (id 1, admin, password `wonderland`)
/// - `bob` (id 2, password `builder`)
/// - client `cli:sec` owned by alice, allowed `password` and `client_credentials`
/// - client `pw-only:sec` owned by bob, allowed `password` only
/// - client `orphan:sec` owned by a user that does not exist
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture
///         .post_form(
///             "/api/oauth/token",
///             &[("grant_type", "password"), ("username", "alice"), ("password", "wonderland")],
///             Some(&TestFixture::basic("cli", "sec")),
///         )
///         .await;
///
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub settings: Settings,
    /// State shared with the router
    pub state: AppState,
}

impl TestFixture {
    /// Creates a fixture with [`Settings::for_test`]
    pub async fn new() -> Self {
        Self::with_settings(Settings::for_test()).await
    }

    /// Creates a fixture with custom settings
    pub async fn with_settings(settings: Settings) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let passwords =
            PasswordHasher::new(settings.password.bcrypt_cost).expect("Failed to create hasher");
        let directory = Self::seed_directory(&passwords).await;
        let cache = create_cache(&settings.cache)
            .await
            .expect("Failed to create cache");

        let state = AppState::with_parts(settings.clone(), cache, passwords, Arc::new(directory));
        let app = create_app(state.clone()).await;

        Self {
            app,
            settings,
            state,
        }
    }

    async fn seed_directory(passwords: &PasswordHasher) -> InMemoryDirectory {
        let alice_hash = passwords
            .hash_password(ALICE.1)
            .await
            .expect("Failed to hash password");
        let bob_hash = passwords
            .hash_password(BOB.1)
            .await
            .expect("Failed to hash password");

        let client = |client_id: &str, user_id: i64, grant_types: &[&str]| OAuthClient {
            client_id: client_id.to_string(),
            client_secret: "sec".to_string(),
            user_id,
            grant_types: grant_types.iter().map(|g| g.to_string()).collect(),
        };

        InMemoryDirectory::new()
            .with_user(User {
                id: 1,
                name: ALICE.0.to_string(),
                email: "alice@example.com".to_string(),
                password_hash: alice_hash,
                is_admin: true,
            })
            .with_user(User {
                id: 2,
                name: BOB.0.to_string(),
                email: "bob@example.com".to_string(),
                password_hash: bob_hash,
                is_admin: false,
            })
            .with_client(client("cli", 1, &["password", "client_credentials"]))
            .with_client(client("pw-only", 2, &["password"]))
            .with_client(client("orphan", 99, &["client_credentials"]))
    }

    /// Initializes the test logger with customized settings.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// `Authorization` header value for HTTP Basic client credentials
    pub fn basic(client_id: &str, client_secret: &str) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{client_id}:{client_secret}"))
        )
    }

    /// Sends a GET request without credentials
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        self.get_with_bearer(uri, None).await
    }

    /// Sends a GET request with an optional bearer token
    pub async fn get_with_bearer(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(uri.as_ref());
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = builder.body(Body::empty()).expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a form encoded POST request with an optional `Authorization` header
    pub async fn post_form(
        &self,
        uri: impl AsRef<str>,
        fields: &[(&str, &str)],
        authorization: Option<&str>,
    ) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).expect("Failed to encode form");

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri.as_ref())
            .header("Content-Type", "application/x-www-form-urlencoded");
        if let Some(authorization) = authorization {
            builder = builder.header("Authorization", authorization);
        }

        let request = builder
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes()
            .to_vec();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse {
            status,
            headers,
            body,
            json,
        }
    }
}

/// Response from a test request that provides convenient access to status and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Vec<u8>,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Asserts the status and the `message` field of an error body
    pub fn assert_error(&self, expected: StatusCode, message: &str) -> &Self {
        self.assert_status(expected);
        assert_eq!(self.json["message"], message);
        self
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }

    /// Value of a response header, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
