//! Cryptographic utilities shared across Jobtrack crates
//!
//! Password hashing uses bcrypt (salt embedded in the hash string).
//! Session identifiers and OAuth `state` values come from the OS RNG.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::error::{Error, Result};

/// Bcrypt cost factor for password hashing
pub const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a password with a fresh random salt.
///
/// Runs on the blocking thread pool; bcrypt is CPU-bound.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Anything that is not a bcrypt hash (for example the placeholder stored
/// for provider-created accounts) never verifies.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    bcrypt::verify(plaintext, stored_hash).unwrap_or(false)
}

/// Generate a URL-safe random token from `bytes` bytes of OS randomness
pub fn random_token(bytes: usize) -> Result<String> {
    let mut buf = vec![0u8; bytes];
    getrandom::getrandom(&mut buf)
        .map_err(|e| Error::Internal(format!("Random generation failed: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}
