//! Authentication configuration

use crate::error::AuthError;

/// Scopes requested from the identity provider
pub const DEFAULT_SCOPES: &str = "openid profile email";

/// Name of the browser cookie carrying the session id
pub const DEFAULT_COOKIE_NAME: &str = "jobtrack_session";

/// Authentication configuration.
///
/// Endpoint URLs default to the Auth0 layout under the issuer and can each
/// be overridden for other providers.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub jwks_url: String,
    pub logout_url: String,
    /// Where the provider sends the browser after login (`/callback`)
    pub redirect_url: String,
    /// Where the provider sends the browser after logout
    pub post_logout_redirect_url: String,
    pub scopes: String,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// Idle lifetime of a server-side session
    pub session_ttl: chrono::Duration,
}

impl AuthConfig {
    /// Build from explicit provider coordinates with default endpoint layout
    pub fn new(
        issuer: &str,
        client_id: &str,
        client_secret: &str,
        app_base_url: &str,
        cookie_secure: bool,
    ) -> Self {
        let issuer = normalize_issuer(issuer);
        let app_base_url = app_base_url.trim_end_matches('/');

        Self {
            authorize_url: format!("{}authorize", issuer),
            token_url: format!("{}oauth/token", issuer),
            jwks_url: format!("{}.well-known/jwks.json", issuer),
            logout_url: format!("{}v2/logout", issuer),
            redirect_url: format!("{}/callback", app_base_url),
            post_logout_redirect_url: format!("{}/", app_base_url),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            issuer,
            scopes: DEFAULT_SCOPES.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure,
            session_ttl: chrono::Duration::days(7),
        }
    }

    /// Create auth config from environment variables
    pub fn from_env(app_base_url: &str, cookie_secure: bool) -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let required = |name: &str| {
            std::env::var(name)
                .map_err(|_| AuthError::Configuration(format!("{} is required", name)))
        };

        let mut config = Self::new(
            &required("OIDC_ISSUER")?,
            &required("OIDC_CLIENT_ID")?,
            &required("OIDC_CLIENT_SECRET")?,
            app_base_url,
            cookie_secure,
        );

        if let Ok(url) = std::env::var("OIDC_AUTHORIZE_URL") {
            config.authorize_url = url;
        }
        if let Ok(url) = std::env::var("OIDC_TOKEN_URL") {
            config.token_url = url;
        }
        if let Ok(url) = std::env::var("OIDC_JWKS_URL") {
            config.jwks_url = url;
        }
        if let Ok(url) = std::env::var("OIDC_LOGOUT_URL") {
            config.logout_url = url;
        }
        if let Some(hours) = std::env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
        {
            config.session_ttl = chrono::Duration::hours(hours);
        }

        Ok(config)
    }
}

/// Issuers are compared verbatim against the `iss` claim; Auth0 issues them
/// with a trailing slash and bare domains are accepted for convenience.
fn normalize_issuer(issuer: &str) -> String {
    let with_scheme = if issuer.starts_with("http://") || issuer.starts_with("https://") {
        issuer.to_string()
    } else {
        format!("https://{}", issuer)
    };

    if with_scheme.ends_with('/') {
        with_scheme
    } else {
        format!("{}/", with_scheme)
    }
}
