//! In-memory user repository

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use jobtrack_common::RepositoryError;

use super::UserRepository;
use crate::domain::entities::User;

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    rows: Arc<Mutex<Rows>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Rows> {
        self.rows.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut rows = self.lock();

        if rows
            .users
            .values()
            .any(|u| u.email == email || u.username == username)
        {
            return Err(RepositoryError::AlreadyExists);
        }

        rows.next_id += 1;
        let user = User {
            id: rows.next_id,
            email: email.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        rows.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.lock()
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
