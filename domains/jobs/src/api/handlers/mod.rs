//! HTTP handlers for the Jobs domain

pub mod contact;
pub mod jobs;

use jobtrack_auth::AuthContext;
use jobtrack_common::Result;

use crate::api::middleware::JobsState;
use crate::domain::entities::Job;

/// Flash shown when a job id is missing or belongs to someone else
pub const JOB_NOT_FOUND: &str = "Job not found";

/// Load a job the current user owns.
///
/// Jobs posted by other users are reported as missing.
pub async fn find_owned_job(
    state: &JobsState,
    ctx: &AuthContext,
    id: i64,
) -> Result<Option<Job>> {
    let job = state.jobs.find(id).await?;
    Ok(job.filter(|job| {
        let owned = ctx.owns(job.poster_id);
        if !owned {
            tracing::warn!(
                user_id = ctx.user_id(),
                job_id = job.id,
                "Job access denied: not the poster"
            );
        }
        owned
    }))
}
