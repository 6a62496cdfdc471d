//! Jobs domain: job postings, status tracking, contact emails

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::validation::{EmailForm, FieldErrors, JobEditForm, JobForm};

// Re-export repository types
pub use repository::{CreateOutcome, JobRepository, MemoryJobRepository, PgJobRepository};

// Re-export API types
pub use api::routes;
pub use api::JobsState;
