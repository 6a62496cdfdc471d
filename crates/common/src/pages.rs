//! Server-rendered page helpers
//!
//! Templates live in the workspace `templates/` directory; every page
//! extends `base.html`, which expects a `flashes` field on the template.

use askama::Template;
use axum::response::Html;

use crate::error::{Error, Result};

/// Render a template into an HTML response body
pub fn render<T: Template>(template: &T) -> Result<Html<String>> {
    template.render().map(Html).map_err(|e| {
        tracing::error!(error = %e, "Failed to render template");
        Error::Internal(format!("Template rendering failed: {}", e))
    })
}

/// Generic error page
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub status: u16,
    pub title: &'a str,
    pub message: &'a str,
    pub flashes: Vec<String>,
}
