//! Page templates for the users views

use askama::Template;
use jobtrack_jobs::Job;

use crate::domain::entities::User;

/// An account row on the landing page
pub struct UserRow {
    pub user: User,
    pub is_current: bool,
}

/// Landing page: every job and every account
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub jobs: Vec<Job>,
    pub users: Vec<UserRow>,
    pub logged_in: bool,
    pub flashes: Vec<String>,
}

impl IndexPage {
    pub fn new(
        jobs: Vec<Job>,
        users: Vec<User>,
        current_user_id: Option<i64>,
        flashes: Vec<String>,
    ) -> Self {
        let users = users
            .into_iter()
            .map(|user| UserRow {
                is_current: Some(user.id) == current_user_id,
                user,
            })
            .collect();
        Self {
            jobs,
            users,
            logged_in: current_user_id.is_some(),
            flashes,
        }
    }
}
