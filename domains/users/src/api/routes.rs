//! Route definitions for the Users domain

use axum::{routing::get, Router};

use super::handlers::{auth, users};
use super::middleware::UsersState;

/// Create login, callback and logout routes
fn auth_routes() -> Router<UsersState> {
    Router::new()
        .route("/login", get(auth::login).post(auth::local_login))
        .route(
            "/callback",
            get(auth::callback_query).post(auth::callback_form),
        )
        .route("/logout", get(auth::logout))
}

/// Create landing page and account routes
fn user_routes() -> Router<UsersState> {
    Router::new()
        .route("/", get(users::index))
        .route("/delete_user/{id}", get(users::delete_user))
}

/// Create all Users domain routes
pub fn routes() -> Router<UsersState> {
    Router::new().merge(auth_routes()).merge(user_routes())
}
