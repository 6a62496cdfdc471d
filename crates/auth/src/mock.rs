//! Mock identity provider
//!
//! Maps authorization codes to canned identities so the full login flow can
//! be driven in tests without a real provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use crate::claims::{IdentityClaims, TokenSet};
use crate::error::AuthError;
use crate::provider::IdentityProvider;

pub const MOCK_AUTHORIZE_URL: &str = "https://idp.mock/authorize";
pub const MOCK_LOGOUT_URL: &str = "https://idp.mock/v2/logout";

/// Mock identity provider for testing
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    identities: Arc<Mutex<HashMap<String, IdentityClaims>>>,
    exchanges: Arc<Mutex<Vec<String>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `code` exchange for an identity with this verified email and display name
    pub fn register_code(&self, code: &str, email: &str, name: &str) {
        self.insert_identity(code, email, name, true);
    }

    /// Like `register_code`, but the provider has not verified the email
    pub fn register_unverified_code(&self, code: &str, email: &str, name: &str) {
        self.insert_identity(code, email, name, false);
    }

    fn insert_identity(&self, code: &str, email: &str, name: &str, verified: bool) {
        let claims = IdentityClaims {
            sub: format!("mock|{}", email),
            email: Some(email.to_string()),
            email_verified: Some(verified),
            name: Some(name.to_string()),
            nickname: None,
            sid: Some(format!("mock-sid-{}", code)),
        };
        self.identities
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(code.to_string(), claims);
    }

    /// Simulate the provider being down
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap_or_else(|p| p.into_inner()) = unavailable;
    }

    /// Codes exchanged so far, in order
    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanges
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        Ok(format!(
            "{}?response_type=code&scope=openid%20profile%20email&state={}",
            MOCK_AUTHORIZE_URL, state
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError> {
        if *self.unavailable.lock().unwrap_or_else(|p| p.into_inner()) {
            return Err(AuthError::Provider("mock provider unavailable".to_string()));
        }

        self.exchanges
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(code.to_string());

        let claims = self
            .identities
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(code)
            .cloned()
            .ok_or_else(|| AuthError::Provider(format!("unknown authorization code: {}", code)))?;

        Ok(TokenSet {
            access_token: format!("mock-access-{}", code),
            id_token: None,
            token_type: "Bearer".to_string(),
            expires_at: Some(Utc::now() + Duration::hours(1)),
            claims,
        })
    }

    fn logout_url(&self) -> Result<String, AuthError> {
        Ok(format!("{}?returnTo=http%3A%2F%2Flocalhost%2F", MOCK_LOGOUT_URL))
    }
}
