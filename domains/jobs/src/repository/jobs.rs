//! Postgres job repository

use async_trait::async_trait;
use jobtrack_common::RepositoryError;
use sqlx::PgPool;

use super::transactions::{lock_job_tx, update_job_tx};
use super::{CreateOutcome, JobRepository};
use crate::domain::entities::{Job, JobStatus, JobUpdate, NewJob};

pub const JOB_COLUMNS: &str = "id, created_at, position, company, location, salary_min, \
     salary_max, contact_email, status, poster_id";

#[derive(Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_position(&self, position: &str) -> Result<Option<Job>, RepositoryError> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE position = $1");
        let row = sqlx::query_as::<_, Job>(&query)
            .bind(position)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY id ASC");
        let rows = sqlx::query_as::<_, Job>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_for_owner(
        &self,
        owner_id: i64,
        status: Option<JobStatus>,
    ) -> Result<Vec<Job>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                let query = format!(
                    "SELECT {JOB_COLUMNS} FROM jobs WHERE poster_id = $1 AND status = $2 ORDER BY id ASC"
                );
                sqlx::query_as::<_, Job>(&query)
                    .bind(owner_id)
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query =
                    format!("SELECT {JOB_COLUMNS} FROM jobs WHERE poster_id = $1 ORDER BY id ASC");
                sqlx::query_as::<_, Job>(&query)
                    .bind(owner_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    async fn find(&self, id: i64) -> Result<Option<Job>, RepositoryError> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let row = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, job: &NewJob, owner_id: i64) -> Result<CreateOutcome, RepositoryError> {
        // ON CONFLICT makes concurrent adds of one position insert at most once
        let query = format!(
            "INSERT INTO jobs (position, company, location, salary_min, salary_max, \
                               contact_email, status, poster_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (position) DO NOTHING \
             RETURNING {JOB_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Job>(&query)
            .bind(&job.position)
            .bind(&job.company)
            .bind(&job.location)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(&job.contact_email)
            .bind(job.status)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from_write)?;

        if let Some(created) = inserted {
            return Ok(CreateOutcome::Created(created));
        }

        let existing = self
            .find_by_position(&job.position)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(CreateOutcome::Existing(existing))
    }

    async fn update(&self, id: i64, update: &JobUpdate) -> Result<Job, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut job = lock_job_tx(&mut tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        job.apply(update);

        // Dropping `tx` on any error below rolls the update back
        let updated = update_job_tx(&mut tx, &job)
            .await
            .map_err(RepositoryError::from_write)?;
        tx.commit().await.map_err(RepositoryError::from_write)?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_for_owner(&self, owner_id: i64) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE poster_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
