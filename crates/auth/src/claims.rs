//! Identity claims and token set types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity claims carried in a validated OIDC ID token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (provider user id)
    pub sub: String,
    /// Email address; only trusted when `email_verified` is true
    pub email: Option<String>,
    /// Whether the provider has verified `email`
    #[serde(default)]
    pub email_verified: Option<bool>,
    /// Display name
    pub name: Option<String>,
    /// Short handle, used when no display name is present
    pub nickname: Option<String>,
    /// Provider session id
    pub sid: Option<String>,
}

impl IdentityClaims {
    /// Display name used as the local username
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.nickname.clone())
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.sub.clone())
    }

    /// The email address, if present and verified by the provider
    pub fn verified_email(&self) -> Option<&str> {
        if self.email_verified != Some(true) {
            return None;
        }
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// Opaque provider value stored as a password placeholder for accounts
    /// created through external login
    pub fn session_placeholder(&self) -> String {
        self.sid.clone().unwrap_or_else(|| self.sub.clone())
    }
}

/// Token set returned by the provider, kept in the server-side session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub id_token: Option<String>,
    pub token_type: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub claims: IdentityClaims,
}
