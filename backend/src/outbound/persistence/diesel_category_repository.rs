//! Diesel-backed [`CategoryRepository`] adapter.

use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::ports::{CategoryRepository, PersistenceError};
use crate::domain::{Category, CategoryId, EntryName, NewCategory};

use super::diesel_helpers::{map_query_error, map_unique_name_error, run_blocking};
use super::models::{CategoryRow, NewCategoryRow};
use super::pool::DbPool;
use super::schema::categories;

/// Category persistence over the shared SQLite pool.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn create(&self, category: &NewCategory) -> Result<Category, PersistenceError> {
        let category = category.clone();
        run_blocking(self.pool.clone(), move |conn| {
            diesel::insert_into(categories::table)
                .values(NewCategoryRow {
                    name: category.name.as_ref(),
                    user_id: category.user_id.0,
                })
                .get_result::<CategoryRow>(conn)
                .map(Category::from)
                .map_err(|err| map_unique_name_error(err, category.name.as_ref()))
        })
        .await
    }

    async fn rename(&self, id: CategoryId, name: &EntryName) -> Result<(), PersistenceError> {
        let name = name.clone();
        run_blocking(self.pool.clone(), move |conn| {
            diesel::update(categories::table.find(id.0))
                .set(categories::name.eq(name.as_ref()))
                .execute(conn)
                .map(|_| ())
                .map_err(|err| map_unique_name_error(err, name.as_ref()))
        })
        .await
    }

    async fn delete(&self, id: CategoryId) -> Result<(), PersistenceError> {
        run_blocking(self.pool.clone(), move |conn| {
            diesel::delete(categories::table.find(id.0))
                .execute(conn)
                .map(|_| ())
                .map_err(map_query_error)
        })
        .await
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, PersistenceError> {
        run_blocking(self.pool.clone(), move |conn| {
            categories::table
                .find(id.0)
                .select(CategoryRow::as_select())
                .first::<CategoryRow>(conn)
                .optional()
                .map(|row| row.map(Category::from))
                .map_err(map_query_error)
        })
        .await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, PersistenceError> {
        let name = name.to_owned();
        run_blocking(self.pool.clone(), move |conn| {
            categories::table
                .filter(categories::name.eq(&name))
                .order(categories::id.asc())
                .select(CategoryRow::as_select())
                .first::<CategoryRow>(conn)
                .optional()
                .map(|row| row.map(Category::from))
                .map_err(map_query_error)
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Category>, PersistenceError> {
        run_blocking(self.pool.clone(), move |conn| {
            categories::table
                .order(categories::id.asc())
                .select(CategoryRow::as_select())
                .load::<CategoryRow>(conn)
                .map(|rows| rows.into_iter().map(Category::from).collect())
                .map_err(map_query_error)
        })
        .await
    }
}
