//! Concrete authentication backend
//!
//! Wraps the session store, the identity provider client and the auth
//! configuration. Domain states expose this via `FromRef`:
//! ```ignore
//! impl FromRef<MyDomainState> for AuthBackend {
//!     fn from_ref(state: &MyDomainState) -> Self {
//!         state.auth.clone()
//!     }
//! }
//! ```

use std::sync::Arc;

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jobtrack_common::random_token;

use crate::claims::IdentityClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::provider::IdentityProvider;
use crate::session::Session;
use crate::store::SessionStore;

/// Bytes of randomness in an OAuth `state` value
const OAUTH_STATE_BYTES: usize = 24;

#[derive(Clone)]
pub struct AuthBackend {
    config: Arc<AuthConfig>,
    sessions: Arc<dyn SessionStore>,
    provider: Arc<dyn IdentityProvider>,
}

impl AuthBackend {
    pub fn new(
        config: AuthConfig,
        sessions: Arc<dyn SessionStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sessions,
            provider,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Load the session named by the request cookie, or start a fresh one.
    ///
    /// A fresh session is not stored until `persist` is called.
    pub async fn load_session(&self, jar: &CookieJar) -> Result<Session, AuthError> {
        if let Some(cookie) = jar.get(&self.config.cookie_name) {
            if let Some(session) = self.sessions.load(cookie.value()).await? {
                return Ok(session);
            }
            tracing::debug!("Session cookie did not match a live session");
        }
        Session::new()
    }

    /// Store the session and make sure the browser carries its cookie
    pub async fn persist(&self, session: &Session, jar: CookieJar) -> Result<CookieJar, AuthError> {
        self.sessions.save(session).await?;
        Ok(jar.add(self.session_cookie(session.id.clone())))
    }

    /// Destroy the session server-side and expire the cookie
    pub async fn destroy(&self, session: &Session, jar: CookieJar) -> Result<CookieJar, AuthError> {
        self.sessions.destroy(&session.id).await?;
        Ok(jar.remove(self.session_cookie(String::new())))
    }

    /// Take pending flash messages for display.
    ///
    /// The session is only written back when there was something to clear,
    /// so anonymous page views do not create stored sessions.
    pub async fn take_flashes(
        &self,
        session: &mut Session,
        jar: CookieJar,
    ) -> Result<(Vec<String>, CookieJar), AuthError> {
        let flashes = session.take_flashes();
        if flashes.is_empty() {
            return Ok((flashes, jar));
        }
        let jar = self.persist(session, jar).await?;
        Ok((flashes, jar))
    }

    /// Queue a flash message and redirect (303) to `to`
    pub async fn redirect_with_flash(
        &self,
        session: &mut Session,
        jar: CookieJar,
        message: impl Into<String>,
        to: &str,
    ) -> Result<Response, AuthError> {
        session.flash(message);
        let jar = self.persist(session, jar).await?;
        Ok((jar, Redirect::to(to)).into_response())
    }

    /// Move the session to a fresh id and drop the stored row under the old one.
    ///
    /// Must run before a session is bound to a user so an id handed out
    /// before login cannot ride along into the authenticated session.
    /// The new id reaches the browser on the next `persist`.
    pub async fn rotate(&self, session: &mut Session) -> Result<(), AuthError> {
        let old_id = session.renew_id()?;
        self.sessions.destroy(&old_id).await?;
        tracing::debug!("Session id rotated");
        Ok(())
    }

    /// Start the authorization-code flow.
    ///
    /// Records a fresh `state` on the session and returns the provider URL
    /// to redirect the browser to.
    pub fn initiate_login(&self, session: &mut Session) -> Result<String, AuthError> {
        let state = random_token(OAUTH_STATE_BYTES)
            .map_err(|e| AuthError::SessionStore(format!("Failed to generate state: {}", e)))?;
        let url = self.provider.authorization_url(&state)?;
        session.begin_oauth(state);
        Ok(url)
    }

    /// Finish the authorization-code flow.
    ///
    /// Verifies `state`, exchanges the code and stores the token set on the
    /// session. The session is not yet bound to a local user.
    pub async fn handle_callback(
        &self,
        session: &mut Session,
        code: &str,
        state: &str,
    ) -> Result<IdentityClaims, AuthError> {
        session.consume_oauth_state(state)?;

        let token = self.provider.exchange_code(code).await.map_err(|e| {
            tracing::error!(error = %e, "Authorization code exchange failed");
            e
        })?;

        let claims = token.claims.clone();
        session.store_token(token);
        Ok(claims)
    }

    /// Provider logout URL (ends the provider-side session too)
    pub fn logout_url(&self) -> Result<String, AuthError> {
        self.provider.logout_url()
    }

    fn session_cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.cookie_secure)
            .build()
    }
}
