//! Shared plumbing for the Diesel repository adapters.
//!
//! Diesel's SQLite backend is synchronous, so every adapter call runs its
//! query on the blocking thread pool and maps connection, join, and query
//! failures onto [`PersistenceError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

use crate::domain::ports::PersistenceError;

use super::pool::DbPool;

/// Run a Diesel operation on the blocking pool against a pooled connection.
pub(crate) async fn run_blocking<T, F>(pool: DbPool, op: F) -> Result<T, PersistenceError>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|err| PersistenceError::connection(err.to_string()))?;
        op(&mut conn)
    })
    .await
    .map_err(|err| PersistenceError::query(format!("blocking task failed: {err}")))?
}

/// Map a Diesel error onto a generic query failure.
pub(crate) fn map_query_error(error: DieselError) -> PersistenceError {
    PersistenceError::query(error.to_string())
}

/// Map a Diesel error from an insert or rename of a uniquely-named row,
/// reporting `name` on a unique-constraint collision.
pub(crate) fn map_unique_name_error(error: DieselError, name: &str) -> PersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PersistenceError::duplicate(name)
        }
        other => map_query_error(other),
    }
}
