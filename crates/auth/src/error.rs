//! Authentication errors

use axum::response::{IntoResponse, Redirect, Response};
use jobtrack_common::Error;

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Guarded route hit without an authenticated session
    #[error("Login required")]
    NotLoggedIn,

    /// Callback `state` missing or not the one this session issued
    #[error("OAuth state mismatch")]
    InvalidState,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Identity provider unreachable or rejected the exchange
    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Invalid ID token: {0}")]
    InvalidToken(String),

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Auth configuration error: {0}")]
    Configuration(String),
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotLoggedIn => Error::Authentication("Please log in first.".to_string()),
            AuthError::InvalidState => Error::Authentication(
                "Login could not be verified. Please try again.".to_string(),
            ),
            AuthError::InvalidCredentials => {
                Error::Authentication("Invalid email or password".to_string())
            }
            AuthError::Provider(msg) | AuthError::InvalidToken(msg) => Error::ExternalService(msg),
            AuthError::SessionStore(msg) | AuthError::Configuration(msg) => Error::Internal(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::NotLoggedIn => Redirect::to("/login").into_response(),
            other => Error::from(other).into_response(),
        }
    }
}
