//! Jobtrack application composition root
//!
//! Builds the shared services once at startup and composes the domain
//! routers into a single application.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use jobtrack_auth::{
    spawn_purge_task, AuthBackend, AuthConfig, IdentityProvider, MemorySessionStore, OidcProvider,
    PgSessionStore, SessionStore,
};
use jobtrack_common::config::{Config, SessionBackend};
use jobtrack_email::{EmailConfig, EmailService, EmailServiceFactory};
use jobtrack_jobs::{JobRepository, JobsState, PgJobRepository};
use jobtrack_users::{PgUserRepository, UserRepository, UsersState};
use sqlx::PgPool;

/// How often idle sessions are swept from the store
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Services shared by every request
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub auth: AuthBackend,
    pub email: Arc<dyn EmailService>,
}

impl AppContext {
    /// Build the Postgres-backed context from environment configuration.
    ///
    /// Also starts the background session purge, so call it from within
    /// the tokio runtime.
    pub async fn from_env(config: &Config, pool: PgPool) -> Result<Self, anyhow::Error> {
        let auth_config = AuthConfig::from_env(&config.app_base_url, config.session_cookie_secure)?;

        let sessions: Arc<dyn SessionStore> = match config.session_store {
            SessionBackend::Postgres => {
                tracing::info!("Using Postgres session store");
                Arc::new(PgSessionStore::new(pool.clone(), auth_config.session_ttl))
            }
            SessionBackend::Memory => {
                tracing::warn!("Using in-memory session store; sessions end on restart");
                Arc::new(MemorySessionStore::new(auth_config.session_ttl))
            }
        };

        spawn_purge_task(sessions.clone(), SESSION_PURGE_INTERVAL);

        let provider: Arc<dyn IdentityProvider> = Arc::new(OidcProvider::new(auth_config.clone()));
        let auth = AuthBackend::new(auth_config, sessions, provider);

        let email_config = EmailConfig::from_env()?;
        let email = EmailServiceFactory::create(email_config).await?;

        Ok(Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            jobs: Arc::new(PgJobRepository::new(pool)),
            auth,
            email: Arc::from(email),
        })
    }
}

/// Compose all domain routers over one context
pub fn create_router(ctx: AppContext) -> Router {
    let users_state = UsersState {
        users: ctx.users,
        jobs: ctx.jobs.clone(),
        auth: ctx.auth.clone(),
    };

    let jobs_state = JobsState {
        jobs: ctx.jobs,
        auth: ctx.auth,
        email: ctx.email,
    };

    Router::new()
        .route("/health", get(health_check))
        .merge(jobtrack_users::routes().with_state(users_state))
        .merge(jobtrack_jobs::routes().with_state(jobs_state))
}

/// Create the main application router from configuration
pub async fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let ctx = AppContext::from_env(config, pool).await?;
    Ok(create_router(ctx))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
