//! Identity and session management for Jobtrack
//!
//! Provides the OpenID Connect login flow, server-side sessions keyed by a
//! browser cookie, and axum extractors that work with any domain state
//! implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
pub mod mock;
mod provider;
mod session;
mod store;

pub use backend::AuthBackend;
pub use claims::{IdentityClaims, TokenSet};
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::{AuthUser, CurrentSession};
pub use provider::{IdentityProvider, OidcProvider};
pub use session::{Session, SessionUser};
pub use store::{spawn_purge_task, MemorySessionStore, PgSessionStore, SessionStore};
