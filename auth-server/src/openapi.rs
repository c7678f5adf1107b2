use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const OAUTH_TAG: &str = "OAuth 2.0";
pub(crate) const AUTH_TAG: &str = "Authentication API";
pub(crate) const USERS_TAG: &str = "Users API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health_check,
        crate::api::health::ready_check,
        crate::api::oauth::handlers::token_handler,
        crate::api::auth::login::login_handler,
        crate::api::ping::ping_handler,
        crate::api::users::me_handler,
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = OAUTH_TAG, description = "OAuth 2.0 token endpoint"),
        (name = AUTH_TAG, description = "Username and password login"),
        (name = USERS_TAG, description = "Current user endpoints"),
    ),
    info(
        title = "Auth Server API",
        description = "Credential and token service",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;

/// Registers the `bearer` security scheme used by protected endpoints
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
