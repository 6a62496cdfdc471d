//! Users domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use jobtrack_auth::AuthBackend;
use jobtrack_jobs::JobRepository;

use crate::repository::UserRepository;

/// Application state for the Users domain
///
/// Holds the job repository too: the landing page lists jobs and account
/// removal checks for postings still owned by the account.
#[derive(Clone)]
pub struct UsersState {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub auth: AuthBackend,
}

impl FromRef<UsersState> for AuthBackend {
    fn from_ref(state: &UsersState) -> Self {
        state.auth.clone()
    }
}
