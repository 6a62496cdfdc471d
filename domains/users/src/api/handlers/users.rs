//! Landing page and account removal handlers

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jobtrack_auth::{AuthUser, CurrentSession};
use jobtrack_common::{render, RepositoryError, Result};

use crate::api::middleware::UsersState;
use crate::api::pages::IndexPage;

/// Every job and every account
pub async fn index(
    State(state): State<UsersState>,
    CurrentSession(mut session): CurrentSession,
    jar: CookieJar,
) -> Result<Response> {
    let jobs = state.jobs.list_all().await?;
    let users = state.users.list_all().await?;
    let (flashes, jar) = state.auth.take_flashes(&mut session, jar).await?;

    let page = IndexPage::new(jobs, users, session.user_id(), flashes);
    Ok((jar, render(&page)?).into_response())
}

/// Remove the logged-in user's own account.
///
/// Accounts that still own jobs are kept; the jobs must be deleted first.
pub async fn delete_user(
    AuthUser(mut ctx): AuthUser,
    State(state): State<UsersState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response> {
    if !ctx.owns(id) {
        tracing::warn!(
            user_id = ctx.user_id(),
            target_id = id,
            "Refused to delete another account"
        );
        return Ok(state
            .auth
            .redirect_with_flash(&mut ctx.session, jar, "User not found", "/")
            .await?);
    }

    let owned_jobs = state.jobs.count_for_owner(id).await?;
    if owned_jobs > 0 {
        return Ok(state
            .auth
            .redirect_with_flash(
                &mut ctx.session,
                jar,
                format!("Delete your {} job(s) before deleting your account", owned_jobs),
                "/",
            )
            .await?);
    }

    match state.users.delete(id).await {
        Ok(()) => {
            tracing::info!(user_id = id, "User deleted");
            // The session row goes with the account; expire the cookie too
            let jar = state.auth.destroy(&ctx.session, jar).await?;
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(RepositoryError::NotFound) => Ok(state
            .auth
            .redirect_with_flash(&mut ctx.session, jar, "User not found", "/")
            .await?),
        Err(e) => {
            tracing::error!(user_id = id, error = %e, "Failed to delete user");
            Ok(state
                .auth
                .redirect_with_flash(
                    &mut ctx.session,
                    jar,
                    "Could not delete the account. Please try again.",
                    "/",
                )
                .await?)
        }
    }
}
