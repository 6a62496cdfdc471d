//! Axum extractors for sessions and the login guard
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::session::Session;

/// The browser's session, anonymous or not.
///
/// Never rejects for a missing cookie; a fresh unsaved session is
/// returned instead.
#[derive(Debug)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let session = backend.load_session(&jar).await?;
        Ok(CurrentSession(session))
    }
}

/// Logged-in user guard.
///
/// Rejects with a redirect to `/login` when the session is not
/// authenticated.
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;

        match AuthContext::from_session(session) {
            Some(ctx) => Ok(AuthUser(ctx)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "Unauthenticated request to guarded route");
                Err(AuthError::NotLoggedIn)
            }
        }
    }
}
