//! Contact email handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use jobtrack_auth::AuthUser;
use jobtrack_common::{render, Error, Result};
use jobtrack_email::SenderIdentity;

use super::{find_owned_job, JOB_NOT_FOUND};
use crate::api::middleware::JobsState;
use crate::api::pages::EmailFormPage;
use crate::domain::validation::{EmailForm, FieldErrors};

/// Render the email form for a job's contact
pub async fn email_form(
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

    let page = EmailFormPage {
        job: &job,
        form: EmailForm::default(),
        errors: FieldErrors::default(),
        flashes: Vec::new(),
    };
    Ok(render(&page)?.into_response())
}

/// Send one email to the job's contact on behalf of the current user.
///
/// Relay failures are not retried; the user gets the service unavailable
/// page and nothing is recorded.
pub async fn send_email(
    AuthUser(mut ctx): AuthUser,
    State(state): State<JobsState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<EmailForm>,
) -> Result<Response> {
    let Some(job) = find_owned_job(&state, &ctx, id).await? else {
        return Ok(state
            .auth
            .redirect_with_flash(&mut ctx.session, jar, JOB_NOT_FOUND, "/dashboard")
            .await?);
    };

    let form = match form.check() {
        Ok(form) => form,
        Err((form, errors)) => {
            let page = EmailFormPage {
                job: &job,
                form,
                errors,
                flashes: Vec::new(),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)?).into_response());
        }
    };

    let sender = SenderIdentity {
        name: ctx.user.username.clone(),
        email: ctx.user.email.clone(),
    };

    let receipt = state
        .email
        .send_job_contact(job.id, &job.contact_email, &form.subject, &form.body, &sender)
        .await
        .map_err(|e| {
            tracing::error!(
                user_id = ctx.user_id(),
                job_id = job.id,
                error = %e,
                "Failed to send contact email"
            );
            Error::ExternalService(format!("Email relay failed: {}", e))
        })?;

    tracing::info!(
        user_id = ctx.user_id(),
        job_id = job.id,
        message_id = %receipt.message_id,
        "Contact email sent"
    );

    Ok(state
        .auth
        .redirect_with_flash(
            &mut ctx.session,
            jar,
            format!("Email sent to {}", job.contact_email),
            "/dashboard",
        )
        .await?)
}
