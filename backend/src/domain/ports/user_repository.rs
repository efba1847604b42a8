//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::PersistenceError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user provisioned on first login and return the stored row.
    async fn create(&self, user: &NewUser) -> Result<User, PersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError>;

    /// Fetch a user by email address, the key used for login provisioning.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError>;
}
