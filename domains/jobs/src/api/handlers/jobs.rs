//! Job tracking handlers: dashboard, add, edit, delete

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use jobtrack_auth::AuthUser;
use jobtrack_common::{render, Error, RepositoryError, Result};
use serde::Deserialize;

use super::{find_owned_job, JOB_NOT_FOUND};
use crate::api::middleware::JobsState;
use crate::api::pages::{status_options, DashboardPage, JobEditPage, JobFormPage};
use crate::domain::entities::JobStatus;
use crate::domain::validation::{FieldErrors, JobEditForm, JobForm};
use crate::repository::CreateOutcome;

const SAVE_FAILED: &str = "Could not save the job. Please try again.";

/// Query parameters for the dashboard
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub status: Option<String>,
}

/// List the current user's jobs, optionally filtered by status
pub async fn dashboard(
    AuthUser(mut ctx): AuthUser,
    State(state): State<JobsState>,
    jar: CookieJar,
    Query(params): Query<DashboardParams>,
) -> Result<Response> {
    let filter = params.status.as_deref().map(str::trim).unwrap_or("");
    let status = if filter.is_empty() {
        None
    } else {
        Some(filter.parse::<JobStatus>().map_err(Error::Validation)?)
    };

    let jobs = state.jobs.list_for_owner(ctx.user_id(), status).await?;
    let (flashes, jar) = state.auth.take_flashes(&mut ctx.session, jar).await?;

    let page = DashboardPage {
        username: &ctx.user.username,
        jobs,
        status_options: status_options(filter),
        flashes,
    };
    Ok((jar, render(&page)?).into_response())
}

/// Render the blank add-job form
pub async fn add_job_form(AuthUser(_ctx): AuthUser) -> Result<Response> {
    let page = JobFormPage::new(JobForm::default(), FieldErrors::default());
    Ok(render(&page)?.into_response())
}

/// Create a job posting.
///
/// A posting whose position already exists is not inserted and the
/// existing row is left as it was.
pub async fn add_job(
    AuthUser(mut ctx): AuthUser,
    State(state): State<JobsState>,
    jar: CookieJar,
    Form(form): Form<JobForm>,
) -> Result<Response> {
    let new_job = match form.parse() {
        Ok(new_job) => new_job,
        Err((form, errors)) => {
            let page = JobFormPage::new(form, errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)?).into_response());
        }
    };

    let message = match state.jobs.create(&new_job, ctx.user_id()).await {
        Ok(CreateOutcome::Created(job)) => {
            tracing::info!(user_id = ctx.user_id(), job_id = job.id, "Job created");
            format!("Added {} at {}", job.position, job.company)
        }
        Ok(CreateOutcome::Existing(job)) => {
            tracing::info!(
                user_id = ctx.user_id(),
                job_id = job.id,
                "Job with this position already exists, nothing inserted"
            );
            format!("A job for {} already exists", job.position)
        }
        Err(e) => {
            tracing::error!(user_id = ctx.user_id(), error = %e, "Failed to create job");
            SAVE_FAILED.to_string()
        }
    };

    Ok(state
        .auth
        .redirect_with_flash(&mut ctx.session, jar, message, "/dashboard")
        .await?)
}

/// Render the edit form prefilled from the stored job
pub async fn edit_job_form(
    AuthUser(mut ctx): AuthUser,
    State(state): State<JobsState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response> {
    let Some(job) = find_owned_job(&state, &ctx, id).await? else {
        return Ok(state
            .auth
            .redirect_with_flash(&mut ctx.session, jar, JOB_NOT_FOUND, "/dashboard")
            .await?);
    };

    let page = JobEditPage::new(&job, JobEditForm::from_job(&job), FieldErrors::default());
    Ok(render(&page)?.into_response())
}

/// Overwrite position, company, contact email and status of a job
pub async fn update_job(
    AuthUser(mut ctx): AuthUser,
    State(state): State<JobsState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<JobEditForm>,
) -> Result<Response> {
    let Some(job) = find_owned_job(&state, &ctx, id).await? else {
        return Ok(state
            .auth
            .redirect_with_flash(&mut ctx.session, jar, JOB_NOT_FOUND, "/dashboard")
            .await?);
    };

    let update = match form.parse() {
        Ok(update) => update,
        Err((form, errors)) => {
            let page = JobEditPage::new(&job, form, errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)?).into_response());
        }
    };

    let message = match state.jobs.update(id, &update).await {
        Ok(updated) => {
            tracing::info!(
                user_id = ctx.user_id(),
                job_id = id,
                status = %updated.status,
                "Job updated"
            );
            format!("Updated {}", updated.position)
        }
        Err(RepositoryError::NotFound) => JOB_NOT_FOUND.to_string(),
        Err(RepositoryError::AlreadyExists) => {
            format!("A job for {} already exists", update.position)
        }
        Err(e) => {
            tracing::error!(
                user_id = ctx.user_id(),
                job_id = id,
                error = %e,
                "Failed to update job"
            );
            SAVE_FAILED.to_string()
        }
    };

    Ok(state
        .auth
        .redirect_with_flash(&mut ctx.session, jar, message, "/dashboard")
        .await?)
}

/// Delete one job
pub async fn delete_job(
    AuthUser(mut ctx): AuthUser,
    State(state): State<JobsState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response> {
    if find_owned_job(&state, &ctx, id).await?.is_none() {
        return Ok(state
            .auth
            .redirect_with_flash(&mut ctx.session, jar, JOB_NOT_FOUND, "/dashboard")
            .await?);
    }

    let message = match state.jobs.delete(id).await {
        Ok(()) => {
            tracing::info!(user_id = ctx.user_id(), job_id = id, "Job deleted");
            "Job deleted".to_string()
        }
        Err(RepositoryError::NotFound) => JOB_NOT_FOUND.to_string(),
        Err(e) => {
            tracing::error!(
                user_id = ctx.user_id(),
                job_id = id,
                error = %e,
                "Failed to delete job"
            );
            "Could not delete the job. Please try again.".to_string()
        }
    };

    Ok(state
        .auth
        .redirect_with_flash(&mut ctx.session, jar, message, "/dashboard")
        .await?)
}
