//! Diesel-backed [`ItemRepository`] adapter.

use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::ports::{ItemRepository, PersistenceError};
use crate::domain::{Category, CategoryId, Item, ItemChanges, ItemId, NewItem};

use super::diesel_helpers::{map_query_error, run_blocking};
use super::models::{CategoryRow, ItemChangesRow, ItemRow, NewItemRow};
use super::pool::DbPool;
use super::schema::{categories, items};

/// Item persistence over the shared SQLite pool.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn create(&self, item: &NewItem) -> Result<Item, PersistenceError> {
        let item = item.clone();
        run_blocking(self.pool.clone(), move |conn| {
            diesel::insert_into(items::table)
                .values(NewItemRow {
                    name: item.name.as_ref(),
                    description: &item.description,
                    picture: &item.picture,
                    date: item.date,
                    category_id: item.category_id.0,
                    user_id: item.user_id.0,
                })
                .get_result::<ItemRow>(conn)
                .map(Item::from)
                .map_err(map_query_error)
        })
        .await
    }

    async fn update(&self, id: ItemId, changes: &ItemChanges) -> Result<Item, PersistenceError> {
        let changeset = ItemChangesRow::from(changes);
        run_blocking(self.pool.clone(), move |conn| {
            diesel::update(items::table.find(id.0))
                .set(changeset)
                .get_result::<ItemRow>(conn)
                .map(Item::from)
                .map_err(map_query_error)
        })
        .await
    }

    async fn delete(&self, id: ItemId) -> Result<(), PersistenceError> {
        run_blocking(self.pool.clone(), move |conn| {
            diesel::delete(items::table.find(id.0))
                .execute(conn)
                .map(|_| ())
                .map_err(map_query_error)
        })
        .await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Item>, PersistenceError> {
        let name = name.to_owned();
        run_blocking(self.pool.clone(), move |conn| {
            items::table
                .filter(items::name.eq(&name))
                .order(items::id.asc())
                .select(ItemRow::as_select())
                .first::<ItemRow>(conn)
                .optional()
                .map(|row| row.map(Item::from))
                .map_err(map_query_error)
        })
        .await
    }

    async fn list_for_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Item>, PersistenceError> {
        run_blocking(self.pool.clone(), move |conn| {
            items::table
                .filter(items::category_id.eq(category_id.0))
                .order(items::id.asc())
                .select(ItemRow::as_select())
                .load::<ItemRow>(conn)
                .map(|rows| rows.into_iter().map(Item::from).collect())
                .map_err(map_query_error)
        })
        .await
    }

    async fn count_for_category(&self, category_id: CategoryId) -> Result<i64, PersistenceError> {
        run_blocking(self.pool.clone(), move |conn| {
            items::table
                .filter(items::category_id.eq(category_id.0))
                .count()
                .get_result::<i64>(conn)
                .map_err(map_query_error)
        })
        .await
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<(Item, Category)>, PersistenceError> {
        run_blocking(self.pool.clone(), move |conn| {
            items::table
                .inner_join(categories::table)
                .order(items::date.desc())
                .limit(limit)
                .select((ItemRow::as_select(), CategoryRow::as_select()))
                .load::<(ItemRow, CategoryRow)>(conn)
                .map(|rows| {
                    rows.into_iter()
                        .map(|(item, category)| (Item::from(item), Category::from(category)))
                        .collect()
                })
                .map_err(map_query_error)
        })
        .await
    }
}
