//! External OpenID Connect provider client
//!
//! Only the relying-party side of the authorization-code flow lives here:
//! building the authorization redirect, exchanging the code at the token
//! endpoint and validating the returned ID token.

use chrono::{Duration, Utc};
use jsonwebtoken::jwk::JwkSet;
use reqwest::Url;
use serde::Deserialize;

use crate::claims::TokenSet;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwt::validate_id_token;

/// Identity provider operations used by the login flow
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authorization endpoint URL carrying `state`
    fn authorization_url(&self, state: &str) -> Result<String, AuthError>;

    /// Exchange an authorization code for a validated token set
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError>;

    /// Provider logout URL that returns the browser to this app
    fn logout_url(&self) -> Result<String, AuthError>;
}

/// Token endpoint response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    id_token: Option<String>,
    #[serde(default = "default_token_type")]
    token_type: String,
    expires_in: Option<i64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// HTTP client for a standard OIDC provider
#[derive(Clone)]
pub struct OidcProvider {
    http: reqwest::Client,
    config: AuthConfig,
}

impl OidcProvider {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .http
            .get(&self.config.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("JWKS request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::Provider(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::Provider(format!("Invalid JWKS document: {}", e)))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for OidcProvider {
    fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", self.config.scopes.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Configuration(format!("Invalid authorize URL: {}", e)))?;

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Token exchange rejected");
            return Err(AuthError::Provider(format!(
                "Token endpoint returned {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("Invalid token response: {}", e)))?;

        let id_token = token
            .id_token
            .ok_or_else(|| AuthError::InvalidToken("token response has no id_token".to_string()))?;

        let jwks = self.fetch_jwks().await?;
        let claims = validate_id_token(
            &id_token,
            &jwks,
            &self.config.issuer,
            &self.config.client_id,
        )?;

        tracing::info!(sub = %claims.sub, "Authorization code exchanged");

        Ok(TokenSet {
            access_token: token.access_token,
            id_token: Some(id_token),
            token_type: token.token_type,
            expires_at: token.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
            claims,
        })
    }

    fn logout_url(&self) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            &self.config.logout_url,
            &[
                ("returnTo", self.config.post_logout_redirect_url.as_str()),
                ("client_id", self.config.client_id.as_str()),
            ],
        )
        .map_err(|e| AuthError::Configuration(format!("Invalid logout URL: {}", e)))?;

        Ok(url.to_string())
    }
}
