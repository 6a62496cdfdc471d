//! Repository implementations for the Users domain

pub mod memory;
pub mod users;

use jobtrack_common::RepositoryError;

use crate::domain::entities::User;

pub use memory::MemoryUserRepository;
pub use users::{PgUserRepository, USER_COLUMNS};

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account; `AlreadyExists` if the email or username is taken
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    async fn find(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Every account, ascending id
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;

    /// Remove an account; `NotFound` if the id is absent
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}
