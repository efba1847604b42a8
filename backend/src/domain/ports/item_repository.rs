//! Port abstraction for item persistence adapters.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, Item, ItemChanges, ItemId, NewItem};

use super::PersistenceError;

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert an item and return the stored row.
    async fn create(&self, item: &NewItem) -> Result<Item, PersistenceError>;

    /// Apply an edit to an item and return the updated row.
    async fn update(&self, id: ItemId, changes: &ItemChanges) -> Result<Item, PersistenceError>;

    /// Delete an item.
    async fn delete(&self, id: ItemId) -> Result<(), PersistenceError>;

    /// Fetch an item by display name (first match by ascending id).
    async fn find_by_name(&self, name: &str) -> Result<Option<Item>, PersistenceError>;

    /// List the items of one category ordered by ascending id.
    async fn list_for_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Item>, PersistenceError>;

    /// Count the items of one category.
    async fn count_for_category(&self, category_id: CategoryId) -> Result<i64, PersistenceError>;

    /// List the most recently modified items across the catalog, newest
    /// first, paired with their category.
    async fn list_recent(&self, limit: i64) -> Result<Vec<(Item, Category)>, PersistenceError>;
}
