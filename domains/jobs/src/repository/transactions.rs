//! Transaction helpers for the Jobs domain

use super::jobs::JOB_COLUMNS;
use crate::domain::entities::Job;
use sqlx::{Postgres, Transaction};

/// Load a job and hold its row lock until the transaction ends
pub async fn lock_job_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<Job>, sqlx::Error> {
    let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1 FOR UPDATE");
    let row = sqlx::query_as::<_, Job>(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row)
}

/// Write the editable fields of a job within a transaction
pub async fn update_job_tx(
    tx: &mut Transaction<'_, Postgres>,
    job: &Job,
) -> Result<Job, sqlx::Error> {
    let query = format!(
        "UPDATE jobs SET \
            position = $2, company = $3, contact_email = $4, status = $5 \
         WHERE id = $1 \
         RETURNING {JOB_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Job>(&query)
        .bind(job.id)
        .bind(&job.position)
        .bind(&job.company)
        .bind(&job.contact_email)
        .bind(job.status)
        .fetch_one(&mut **tx)
        .await?;
    Ok(row)
}
