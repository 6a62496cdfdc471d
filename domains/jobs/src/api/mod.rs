//! API layer for the Jobs domain
//!
//! Contains HTTP handlers, routes, page templates and domain state.

pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod routes;

pub use middleware::JobsState;
pub use routes::routes;
