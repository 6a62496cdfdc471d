//! Session storage backends
//!
//! `PgSessionStore` keeps sessions in the `sessions` table so any instance
//! can serve any browser. `MemorySessionStore` is for tests and
//! single-process local runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use sqlx::{types::Json, PgPool};
use tokio::task::JoinHandle;

use crate::error::AuthError;
use crate::session::Session;

/// Server-side session persistence
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a live session; expired or unknown ids yield `None`
    async fn load(&self, id: &str) -> Result<Option<Session>, AuthError>;

    /// Insert or replace a session
    async fn save(&self, session: &Session) -> Result<(), AuthError>;

    /// Remove a session; unknown ids are not an error
    async fn destroy(&self, id: &str) -> Result<(), AuthError>;

    /// Delete sessions idle for longer than the TTL. Returns sessions removed.
    async fn purge_expired(&self) -> Result<u64, AuthError>;
}

/// Purge expired sessions every `every` until the runtime shuts down.
///
/// The first purge runs immediately. Failures are logged and retried on
/// the next tick.
pub fn spawn_purge_task(store: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Purged expired sessions"),
                Err(e) => tracing::error!(error = %e, "Session purge failed"),
            }
        }
    })
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    data: Json<Session>,
}

/// Postgres-backed session store
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
    ttl: chrono::Duration,
}

impl PgSessionStore {
    pub fn new(pool: PgPool, ttl: chrono::Duration) -> Self {
        Self { pool, ttl }
    }
}

#[async_trait::async_trait]
impl SessionStore for PgSessionStore {
    async fn load(&self, id: &str) -> Result<Option<Session>, AuthError> {
        let cutoff = Utc::now() - self.ttl;
        let row: Option<SessionRow> =
            sqlx::query_as("SELECT data FROM sessions WHERE id = $1 AND updated_at > $2")
                .bind(id)
                .bind(cutoff)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to load session");
                    AuthError::SessionStore(e.to_string())
                })?;

        Ok(row.map(|r| r.data.0))
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                data = EXCLUDED.data,
                updated_at = NOW()
            "#,
        )
        .bind(&session.id)
        .bind(session.user_id())
        .bind(Json(session))
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to save session");
            AuthError::SessionStore(e.to_string())
        })?;

        Ok(())
    }

    async fn destroy(&self, id: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to delete session");
                AuthError::SessionStore(e.to_string())
            })?;

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, AuthError> {
        let cutoff = Utc::now() - self.ttl;
        let result = sqlx::query("DELETE FROM sessions WHERE updated_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to purge sessions");
                AuthError::SessionStore(e.to_string())
            })?;
        Ok(result.rows_affected())
    }
}

/// In-memory session store
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    ttl: chrono::Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        // A poisoned map still holds consistent sessions; each write is a single insert/remove
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(chrono::Duration::days(7))
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<Session>, AuthError> {
        let cutoff = Utc::now() - self.ttl;
        let mut sessions = self.lock();
        match sessions.get(id) {
            Some(session) if session.updated_at > cutoff => Ok(Some(session.clone())),
            Some(_) => {
                sessions.remove(id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        let mut stored = session.clone();
        stored.updated_at = Utc::now();
        self.lock().insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn destroy(&self, id: &str) -> Result<(), AuthError> {
        self.lock().remove(id);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, AuthError> {
        let cutoff = Utc::now() - self.ttl;
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, session| session.updated_at > cutoff);
        Ok((before - sessions.len()) as u64)
    }
}
