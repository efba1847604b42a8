//! Port abstraction for category persistence adapters.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, EntryName, NewCategory};

use super::PersistenceError;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category and return the stored row.
    ///
    /// A name collision surfaces as [`PersistenceError::Duplicate`].
    async fn create(&self, category: &NewCategory) -> Result<Category, PersistenceError>;

    /// Rename a category.
    async fn rename(&self, id: CategoryId, name: &EntryName) -> Result<(), PersistenceError>;

    /// Delete a category. Fails while items still reference it.
    async fn delete(&self, id: CategoryId) -> Result<(), PersistenceError>;

    /// Fetch a category by identifier.
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, PersistenceError>;

    /// Fetch a category by display name (first match by ascending id).
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, PersistenceError>;

    /// List all categories ordered by ascending id.
    async fn list(&self) -> Result<Vec<Category>, PersistenceError>;
}
