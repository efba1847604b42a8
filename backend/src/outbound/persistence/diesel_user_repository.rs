//! Diesel-backed [`UserRepository`] adapter.

use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::ports::{PersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};

use super::diesel_helpers::{map_query_error, map_unique_name_error, run_blocking};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// User persistence over the shared SQLite pool.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, PersistenceError> {
        let user = user.clone();
        run_blocking(self.pool.clone(), move |conn| {
            diesel::insert_into(users::table)
                .values(NewUserRow {
                    name: &user.name,
                    email: &user.email,
                    picture: &user.picture,
                })
                .get_result::<UserRow>(conn)
                .map(User::from)
                .map_err(|err| map_unique_name_error(err, &user.email))
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError> {
        run_blocking(self.pool.clone(), move |conn| {
            users::table
                .find(id.0)
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map(|row| row.map(User::from))
                .map_err(map_query_error)
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        let email = email.to_owned();
        run_blocking(self.pool.clone(), move |conn| {
            users::table
                .filter(users::email.eq(&email))
                .order(users::id.asc())
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map(|row| row.map(User::from))
                .map_err(map_query_error)
        })
        .await
    }
}
