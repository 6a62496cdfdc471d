//! Resolving a provider identity to a local account

use jobtrack_auth::IdentityClaims;
use jobtrack_common::{Error, RepositoryError, Result};

use crate::domain::entities::User;
use crate::repository::UserRepository;

/// Find the local account for a verified identity, creating it on first login.
///
/// Looks up by email, which the provider must have marked verified;
/// anything else is an authentication failure. A new account takes the
/// provider display name as its username and the provider session id as
/// its password placeholder. If a concurrent first login for the same
/// email wins the insert, its row is returned, so repeat logins never
/// produce a second account.
pub async fn resolve_or_create(
    users: &dyn UserRepository,
    claims: &IdentityClaims,
) -> Result<User> {
    let email = claims.verified_email().ok_or_else(|| {
        tracing::warn!(sub = %claims.sub, "Login rejected: no verified email in identity");
        Error::Authentication(
            "Your identity provider has not verified your email address.".to_string(),
        )
    })?;

    if let Some(user) = users.find_by_email(email).await? {
        tracing::debug!(user_id = user.id, "Resolved existing user for login");
        return Ok(user);
    }

    let username = claims.display_name();
    match users
        .create(email, &username, &claims.session_placeholder())
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = user.id, "Created user on first login");
            Ok(user)
        }
        Err(RepositoryError::AlreadyExists) => {
            // Either a concurrent login inserted this email, or the username
            // belongs to a different account
            users.find_by_email(email).await?.ok_or_else(|| {
                tracing::warn!(username = %username, "Username already taken by another account");
                Error::Conflict(format!("The username {} is already taken.", username))
            })
        }
        Err(e) => Err(e.into()),
    }
}
