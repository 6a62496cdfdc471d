//! In-memory job repository
//!
//! Mirrors the Postgres semantics: ascending ids, global position
//! uniqueness, all-or-nothing updates.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use jobtrack_common::RepositoryError;

use super::{CreateOutcome, JobRepository};
use crate::domain::entities::{Job, JobStatus, JobUpdate, NewJob};

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    jobs: BTreeMap<i64, Job>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryJobRepository {
    rows: Arc<Mutex<Rows>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail as if the database were unreachable
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap_or_else(|p| p.into_inner()) = fail;
    }

    pub fn len(&self) -> usize {
        self.rows
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .jobs
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if *self.fail_writes.lock().unwrap_or_else(|p| p.into_inner()) {
            return Err(RepositoryError::Connection(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Rows> {
        self.rows.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(self.lock().jobs.values().cloned().collect())
    }

    async fn list_for_owner(
        &self,
        owner_id: i64,
        status: Option<JobStatus>,
    ) -> Result<Vec<Job>, RepositoryError> {
        Ok(self
            .lock()
            .jobs
            .values()
            .filter(|job| job.poster_id == owner_id)
            .filter(|job| status.is_none_or(|s| job.status == s))
            .cloned()
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Job>, RepositoryError> {
        Ok(self.lock().jobs.get(&id).cloned())
    }

    async fn create(&self, job: &NewJob, owner_id: i64) -> Result<CreateOutcome, RepositoryError> {
        self.check_writable()?;
        let mut rows = self.lock();

        if let Some(existing) = rows.jobs.values().find(|j| j.position == job.position) {
            return Ok(CreateOutcome::Existing(existing.clone()));
        }

        rows.next_id += 1;
        let created = Job {
            id: rows.next_id,
            created_at: Utc::now(),
            position: job.position.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            contact_email: job.contact_email.clone(),
            status: job.status,
            poster_id: owner_id,
        };
        rows.jobs.insert(created.id, created.clone());
        Ok(CreateOutcome::Created(created))
    }

    async fn update(&self, id: i64, update: &JobUpdate) -> Result<Job, RepositoryError> {
        self.check_writable()?;
        let mut rows = self.lock();

        if rows
            .jobs
            .values()
            .any(|j| j.id != id && j.position == update.position)
        {
            return Err(RepositoryError::AlreadyExists);
        }

        let job = rows.jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        job.apply(update);
        Ok(job.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.lock()
            .jobs
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn count_for_owner(&self, owner_id: i64) -> Result<i64, RepositoryError> {
        let count = self
            .lock()
            .jobs
            .values()
            .filter(|job| job.poster_id == owner_id)
            .count();
        Ok(count as i64)
    }
}
