//! Login, provider callback and logout handlers
//!
//! - GET /login - Redirect to the identity provider
//! - POST /login - Legacy email and password login
//! - GET|POST /callback - Complete the authorization-code exchange
//! - GET /logout - End the local and provider sessions

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use jobtrack_auth::{AuthError, CurrentSession, Session};
use jobtrack_common::Result;
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::UsersState;
use crate::domain::auth::resolve_or_create;

const INVALID_LOGIN: &str = "Invalid email or password";

/// Legacy local login form
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Parameters the provider sends back to the callback
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Start the provider login
pub async fn login(
    State(state): State<UsersState>,
    CurrentSession(mut session): CurrentSession,
    jar: CookieJar,
) -> Result<Response> {
    if session.is_authenticated() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let url = state.auth.initiate_login(&mut session)?;
    let jar = state.auth.persist(&session, jar).await?;

    tracing::debug!("Redirecting to identity provider");
    Ok((jar, Redirect::to(&url)).into_response())
}

/// Legacy login against the stored password hash
pub async fn local_login(
    State(state): State<UsersState>,
    CurrentSession(mut session): CurrentSession,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if form.validate().is_err() {
        return Ok(state
            .auth
            .redirect_with_flash(&mut session, jar, INVALID_LOGIN, "/")
            .await?);
    }

    let user = state.users.find_by_email(form.email.trim()).await?;
    let Some(user) = user.filter(|u| u.verify_password(&form.password)) else {
        tracing::info!("Local login rejected");
        return Ok(state
            .auth
            .redirect_with_flash(&mut session, jar, INVALID_LOGIN, "/")
            .await?);
    };

    state.auth.rotate(&mut session).await?;
    session.authenticate(user.session_user());
    let jar = state.auth.persist(&session, jar).await?;

    tracing::info!(user_id = user.id, "User logged in with password");
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

/// Provider callback with parameters in the query string
pub async fn callback_query(
    State(state): State<UsersState>,
    CurrentSession(session): CurrentSession,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    complete_login(state, session, jar, params).await
}

/// Provider callback posted as a form (`response_mode=form_post`)
pub async fn callback_form(
    State(state): State<UsersState>,
    CurrentSession(session): CurrentSession,
    jar: CookieJar,
    Form(params): Form<CallbackParams>,
) -> Result<Response> {
    complete_login(state, session, jar, params).await
}

/// Verify state, exchange the code, bind the session to a local account
async fn complete_login(
    state: UsersState,
    mut session: Session,
    jar: CookieJar,
    params: CallbackParams,
) -> Result<Response> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Identity provider returned an error");
        session.pending_oauth_state = None;
        let message = params
            .error_description
            .unwrap_or_else(|| "Login was not completed.".to_string());
        return Ok(state
            .auth
            .redirect_with_flash(&mut session, jar, message, "/")
            .await?);
    }

    let had_pending = session.pending_oauth_state.is_some();
    let claims = match (params.code, params.state) {
        (Some(code), Some(oauth_state)) => {
            state
                .auth
                .handle_callback(&mut session, &code, &oauth_state)
                .await
        }
        _ => {
            session.pending_oauth_state = None;
            Err(AuthError::InvalidState)
        }
    };

    let claims = match claims {
        Ok(claims) => claims,
        Err(e) => {
            // The pending state is spent; store that so it cannot be retried
            if had_pending {
                state.auth.persist(&session, jar).await?;
            }
            return Err(e.into());
        }
    };

    let user = match resolve_or_create(state.users.as_ref(), &claims).await {
        Ok(user) => user,
        Err(e) => {
            session.token = None;
            state.auth.persist(&session, jar).await?;
            return Err(e);
        }
    };
    state.auth.rotate(&mut session).await?;
    session.authenticate(user.session_user());
    let jar = state.auth.persist(&session, jar).await?;

    tracing::info!(user_id = user.id, "User logged in through identity provider");
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

/// Destroy the local session and end the provider session
pub async fn logout(
    State(state): State<UsersState>,
    CurrentSession(session): CurrentSession,
    jar: CookieJar,
) -> Result<Response> {
    let url = state.auth.logout_url()?;
    let jar = state.auth.destroy(&session, jar).await?;

    if let Some(user_id) = session.user_id() {
        tracing::info!(user_id, "User logged out");
    }
    Ok((jar, Redirect::to(&url)).into_response())
}
