//! Domain entities for the Users domain

use chrono::{DateTime, Utc};

/// Local account
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// bcrypt hash, or the provider session placeholder for accounts created
    /// through external login
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check a plaintext password for the legacy local login.
    ///
    /// Provider-created accounts hold a placeholder and never verify.
    pub fn verify_password(&self, plaintext: &str) -> bool {
        jobtrack_common::verify_password(plaintext, &self.password_hash)
    }

    /// Session view of this account
    pub fn session_user(&self) -> jobtrack_auth::SessionUser {
        jobtrack_auth::SessionUser {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}
