//! Users domain: accounts, login, logout, account removal

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::auth::resolve_or_create;
pub use domain::entities::User;

// Re-export repository types
pub use repository::{MemoryUserRepository, PgUserRepository, UserRepository};

// Re-export API types
pub use api::routes;
pub use api::UsersState;
