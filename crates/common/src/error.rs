//! Common error types and handling for Jobtrack

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::pages::ErrorPage;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Jobtrack application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Identity provider or mail relay failure
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::ExternalService(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Unexpected(_) | Error::Database(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show in the browser.
    ///
    /// Server-side failures collapse to a generic sentence; the detail only
    /// goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            Error::Authentication(msg)
            | Error::Validation(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg) => msg.clone(),
            Error::ExternalService(_) => {
                "The service is temporarily unavailable. Please try again later.".to_string()
            }
            Error::Unexpected(_) | Error::Database(_) | Error::Internal(_) => {
                "Something went wrong on our side.".to_string()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Error::ExternalService(_) => {
                tracing::error!(error = %self, "External service failure");
            }
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %self, "Internal server error");
            }
            _ => {}
        }

        let message = self.public_message();
        let page = ErrorPage {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error"),
            message: &message,
            flashes: Vec::new(),
        };

        match askama::Template::render(&page) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, message).into_response()
            }
        }
    }
}
