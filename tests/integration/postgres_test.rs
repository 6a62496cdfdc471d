//! Postgres repository and session store tests
//!
//! Skipped unless `TEST_DATABASE_URL` is set. Every test uses fresh
//! positions and emails so runs can share a database.

use std::sync::Once;

use anyhow::Result;
use jobtrack_auth::{IdentityClaims, PgSessionStore, Session, SessionStore};
use jobtrack_common::RepositoryError;
use jobtrack_jobs::{
    CreateOutcome, JobRepository, JobStatus, JobUpdate, NewJob, PgJobRepository,
};
use jobtrack_users::{resolve_or_create, PgUserRepository, User, UserRepository};
use sqlx::PgPool;
use uuid::Uuid;

static INIT: Once = Once::new();

async fn test_pool() -> Result<Option<PgPool>> {
    INIT.call_once(|| {
        dotenvy::from_filename(".env.test").ok();
    });

    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return Ok(None);
    };

    let pool = PgPool::connect(&url).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;
    Ok(Some(pool))
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

async fn seed_user(users: &PgUserRepository) -> Result<User> {
    let name = unique("user");
    Ok(users
        .create(&format!("{}@x.com", name), &name, "unused")
        .await?)
}

#[test_log::test(tokio::test)]
async fn test_concurrent_creates_insert_one_row() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let users = PgUserRepository::new(pool.clone());
    let jobs = PgJobRepository::new(pool);
    let owner = seed_user(&users).await?;

    let position = unique("Engineer");
    let first = NewJob::new(position.as_str(), "Acme", "hr@acme.com");
    let second = NewJob::new(position.as_str(), "Globex", "hr@globex.com");

    let (a, b) = tokio::join!(jobs.create(&first, owner.id), jobs.create(&second, owner.id));
    let (a, b) = (a?, b?);

    assert_eq!(a.job().id, b.job().id);
    assert_eq!(
        [a.is_created(), b.is_created()]
            .iter()
            .filter(|created| **created)
            .count(),
        1
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_duplicate_create_leaves_row_untouched() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let users = PgUserRepository::new(pool.clone());
    let jobs = PgJobRepository::new(pool);
    let owner = seed_user(&users).await?;
    let other = seed_user(&users).await?;

    let position = unique("Engineer");
    let created = jobs
        .create(&NewJob::new(position.as_str(), "Acme", "hr@acme.com"), owner.id)
        .await?;
    assert!(matches!(created, CreateOutcome::Created(_)));

    let again = jobs
        .create(&NewJob::new(position.as_str(), "Globex", "x@globex.com"), other.id)
        .await?;
    let CreateOutcome::Existing(existing) = again else {
        panic!("duplicate position should not insert");
    };
    assert_eq!(existing.company, "Acme");
    assert_eq!(existing.poster_id, owner.id);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_update_keeps_location_and_salary() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let users = PgUserRepository::new(pool.clone());
    let jobs = PgJobRepository::new(pool);
    let owner = seed_user(&users).await?;

    let mut new_job = NewJob::new(unique("Engineer"), "Acme", "hr@acme.com");
    new_job.location = Some("Remote".to_string());
    new_job.salary_min = Some(100000);
    new_job.salary_max = Some(150000);
    let job = jobs.create(&new_job, owner.id).await?.job().clone();

    let renamed = unique("Senior Engineer");
    let updated = jobs
        .update(
            job.id,
            &JobUpdate {
                position: renamed.clone(),
                company: "Acme Corp".to_string(),
                contact_email: "talent@acme.com".to_string(),
                status: JobStatus::Offer,
            },
        )
        .await?;

    assert_eq!(updated.position, renamed);
    assert_eq!(updated.status, JobStatus::Offer);
    assert_eq!(updated.location.as_deref(), Some("Remote"));
    assert_eq!(updated.salary_min, Some(100000));
    assert_eq!(updated.salary_max, Some(150000));
    assert_eq!(updated.created_at, job.created_at);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_update_conflict_rolls_back() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let users = PgUserRepository::new(pool.clone());
    let jobs = PgJobRepository::new(pool);
    let owner = seed_user(&users).await?;

    let taken = unique("Engineer");
    jobs.create(&NewJob::new(taken.as_str(), "Acme", "hr@acme.com"), owner.id)
        .await?;
    let manager = jobs
        .create(&NewJob::new(unique("Manager"), "Acme", "hr@acme.com"), owner.id)
        .await?
        .job()
        .clone();

    let result = jobs
        .update(
            manager.id,
            &JobUpdate {
                position: taken,
                company: "Acme".to_string(),
                contact_email: "hr@acme.com".to_string(),
                status: JobStatus::Applied,
            },
        )
        .await;
    assert!(matches!(result, Err(RepositoryError::AlreadyExists)));

    let reloaded = jobs.find(manager.id).await?.unwrap();
    assert_eq!(reloaded.position, manager.position);
    assert_eq!(reloaded.status, JobStatus::Flagged);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_missing_ids_are_not_found() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let jobs = PgJobRepository::new(pool);

    assert!(jobs.find(i64::MAX).await?.is_none());
    assert!(matches!(
        jobs.delete(i64::MAX).await,
        Err(RepositoryError::NotFound)
    ));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_owner_listing_and_filter() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let users = PgUserRepository::new(pool.clone());
    let jobs = PgJobRepository::new(pool);
    let owner = seed_user(&users).await?;
    let other = seed_user(&users).await?;

    let mine = jobs
        .create(&NewJob::new(unique("Engineer"), "Acme", "hr@acme.com"), owner.id)
        .await?
        .job()
        .clone();
    jobs.create(&NewJob::new(unique("Manager"), "Acme", "hr@acme.com"), other.id)
        .await?;

    let listed = jobs.list_for_owner(owner.id, None).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);

    let applied = jobs
        .list_for_owner(owner.id, Some(JobStatus::Applied))
        .await?;
    assert!(applied.is_empty());
    assert_eq!(jobs.count_for_owner(owner.id).await?, 1);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_job_for_unknown_owner_is_invalid() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let jobs = PgJobRepository::new(pool);

    let result = jobs
        .create(&NewJob::new(unique("Engineer"), "Acme", "hr@acme.com"), i64::MAX)
        .await;
    assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_schema_refuses_ownerless_jobs() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let result = sqlx::query(
        "INSERT INTO jobs (position, company, contact_email) VALUES ($1, 'Acme', 'hr@acme.com')",
    )
    .bind(unique("Engineer"))
    .execute(&pool)
    .await;
    assert!(result.is_err());

    let email_nullable: String = sqlx::query_scalar(
        "SELECT is_nullable::text FROM information_schema.columns \
         WHERE table_name = 'users' AND column_name = 'email'",
    )
    .fetch_one(&pool)
    .await?;
    assert_eq!(email_nullable, "NO");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_resolve_or_create_is_idempotent() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let users = PgUserRepository::new(pool);

    let name = unique("ada");
    let claims = IdentityClaims {
        sub: format!("auth0|{}", name),
        email: Some(format!("{}@x.com", name)),
        email_verified: Some(true),
        name: Some(name.clone()),
        nickname: None,
        sid: None,
    };

    let (first, second) = tokio::join!(
        resolve_or_create(&users, &claims),
        resolve_or_create(&users, &claims)
    );
    assert_eq!(first?.id, second?.id);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_session_round_trip_and_cascade() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };
    let users = PgUserRepository::new(pool.clone());
    let store = PgSessionStore::new(pool, chrono::Duration::days(7));
    let user = seed_user(&users).await?;

    let mut session = Session::new()?;
    session.authenticate(user.session_user());
    session.flash("Welcome");
    store.save(&session).await?;

    let loaded = store.load(&session.id).await?.unwrap();
    assert_eq!(loaded.user_id(), Some(user.id));
    assert_eq!(loaded.flashes, vec!["Welcome"]);

    users.delete(user.id).await?;
    assert!(store.load(&session.id).await?.is_none());
    Ok(())
}
