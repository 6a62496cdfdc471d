//! API layer for the Users domain
//!
//! Contains HTTP handlers, routes, page templates and domain state.

pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod routes;

pub use middleware::UsersState;
pub use routes::routes;
