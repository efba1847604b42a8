//! Error types shared by the persistence ports.

use crate::domain::{Error, ErrorCode};

/// Failures raised by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The backing store could not be reached.
    #[error("repository connection failed: {message}")]
    Connection { message: String },
    /// A query or mutation failed during execution.
    #[error("repository query failed: {message}")]
    Query { message: String },
    /// An insert or rename collided with an existing unique name.
    #[error("the name '{name}' is already taken")]
    Duplicate { name: String },
}

impl PersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-name error for the colliding name.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::Duplicate { name: name.into() }
    }
}

/// Map a persistence failure onto the domain error taxonomy.
///
/// Connection failures surface as service-unavailable, query failures as
/// internal errors with the underlying message logged by the adapter, and
/// duplicates as conflicts so forms can show them inline.
pub fn map_persistence_error(error: PersistenceError) -> Error {
    match error {
        PersistenceError::Connection { message } => {
            Error::new(ErrorCode::ServiceUnavailable, message)
        }
        PersistenceError::Query { .. } => Error::internal("Internal server error"),
        PersistenceError::Duplicate { name } => {
            Error::conflict(format!("the name '{name}' is already taken"))
        }
    }
}
