//! Server-side session state

use chrono::{DateTime, Utc};
use jobtrack_common::random_token;
use serde::{Deserialize, Serialize};

use crate::claims::{IdentityClaims, TokenSet};
use crate::error::AuthError;

/// Bytes of randomness in a session id
const SESSION_ID_BYTES: usize = 32;

/// The local account a session is logged in as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub username: String,
}

/// Server-held state correlating one browser to an identity.
///
/// The browser only ever sees `id`; everything else stays in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user: Option<SessionUser>,
    pub pending_oauth_state: Option<String>,
    pub token: Option<TokenSet>,
    pub flashes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh anonymous session with a random id
    pub fn new() -> Result<Self, AuthError> {
        let id = random_token(SESSION_ID_BYTES)
            .map_err(|e| AuthError::SessionStore(format!("Failed to generate session id: {}", e)))?;
        let now = Utc::now();
        Ok(Self {
            id,
            user: None,
            pending_oauth_state: None,
            token: None,
            flashes: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Identity claims from the stored token, if logged in through the provider
    pub fn identity(&self) -> Option<&IdentityClaims> {
        self.token.as_ref().map(|t| &t.claims)
    }

    /// Replace the id with a fresh random one, returning the old id
    pub fn renew_id(&mut self) -> Result<String, AuthError> {
        let id = random_token(SESSION_ID_BYTES)
            .map_err(|e| AuthError::SessionStore(format!("Failed to generate session id: {}", e)))?;
        self.touch();
        Ok(std::mem::replace(&mut self.id, id))
    }

    /// Mark the session as logged in as `user`
    pub fn authenticate(&mut self, user: SessionUser) {
        self.user = Some(user);
        self.touch();
    }

    /// Queue a one-shot message for the next rendered page
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
        self.touch();
    }

    /// Drain queued flash messages
    pub fn take_flashes(&mut self) -> Vec<String> {
        self.touch();
        std::mem::take(&mut self.flashes)
    }

    /// Remember the `state` sent with an authorization request
    pub fn begin_oauth(&mut self, state: String) {
        self.pending_oauth_state = Some(state);
        self.touch();
    }

    /// Consume the pending `state`, succeeding only on an exact match.
    ///
    /// The pending value is cleared either way so it cannot be replayed.
    pub fn consume_oauth_state(&mut self, returned: &str) -> Result<(), AuthError> {
        let pending = self.pending_oauth_state.take();
        self.touch();
        match pending {
            Some(expected) if !returned.is_empty() && expected == returned => Ok(()),
            _ => Err(AuthError::InvalidState),
        }
    }

    pub fn store_token(&mut self, token: TokenSet) {
        self.token = Some(token);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
