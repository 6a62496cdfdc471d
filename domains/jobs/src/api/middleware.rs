//! Jobs domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use jobtrack_auth::AuthBackend;
use jobtrack_email::EmailService;

use crate::repository::JobRepository;

/// Application state for the Jobs domain
#[derive(Clone)]
pub struct JobsState {
    pub jobs: Arc<dyn JobRepository>,
    pub auth: AuthBackend,
    pub email: Arc<dyn EmailService>,
}

impl FromRef<JobsState> for AuthBackend {
    fn from_ref(state: &JobsState) -> Self {
        state.auth.clone()
    }
}
