//! Route definitions for the Jobs domain

use axum::{routing::get, Router};

use super::handlers::{contact, jobs};
use super::middleware::JobsState;

/// Create job tracking routes
fn job_routes() -> Router<JobsState> {
    Router::new()
        .route("/dashboard", get(jobs::dashboard))
        .route("/job/add", get(jobs::add_job_form).post(jobs::add_job))
        .route("/update/{id}", get(jobs::edit_job_form).post(jobs::update_job))
        .route("/delete/{id}", get(jobs::delete_job))
}

/// Create job contact email routes
fn contact_routes() -> Router<JobsState> {
    Router::new().route(
        "/send_email/{id}",
        get(contact::email_form).post(contact::send_email),
    )
}

/// Create all Jobs domain routes
pub fn routes() -> Router<JobsState> {
    Router::new().merge(job_routes()).merge(contact_routes())
}
