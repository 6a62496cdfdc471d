//! Repository implementations for the Jobs domain
//!
//! `JobRepository` is the seam handlers talk to; `PgJobRepository` backs it
//! with Postgres and `MemoryJobRepository` keeps rows in process for tests
//! and database-less local runs.

pub mod jobs;
pub mod memory;
pub mod transactions;

use jobtrack_common::RepositoryError;

use crate::domain::entities::{Job, JobStatus, JobUpdate, NewJob};

pub use jobs::{PgJobRepository, JOB_COLUMNS};
pub use memory::MemoryJobRepository;

/// Result of an add-job request
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A new row was inserted
    Created(Job),
    /// A job with this position already existed and was left untouched
    Existing(Job),
}

impl CreateOutcome {
    pub fn job(&self) -> &Job {
        match self {
            CreateOutcome::Created(job) | CreateOutcome::Existing(job) => job,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

#[async_trait::async_trait]
pub trait JobRepository: Send + Sync {
    /// Every job, ascending id
    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError>;

    /// Jobs posted by `owner_id`, ascending id, optionally with one status
    async fn list_for_owner(
        &self,
        owner_id: i64,
        status: Option<JobStatus>,
    ) -> Result<Vec<Job>, RepositoryError>;

    async fn find(&self, id: i64) -> Result<Option<Job>, RepositoryError>;

    /// Insert a posting unless one with the same position exists anywhere
    async fn create(&self, job: &NewJob, owner_id: i64) -> Result<CreateOutcome, RepositoryError>;

    /// Overwrite position, company, contact email and status as one unit.
    ///
    /// `NotFound` if the id is absent; `AlreadyExists` if the new position
    /// belongs to another job, in which case nothing is written.
    async fn update(&self, id: i64, update: &JobUpdate) -> Result<Job, RepositoryError>;

    /// Remove one job; `NotFound` if the id is absent
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    async fn count_for_owner(&self, owner_id: i64) -> Result<i64, RepositoryError>;
}
