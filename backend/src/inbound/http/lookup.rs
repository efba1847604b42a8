//! Name-keyed lookups shared by the page and CRUD handlers.
//!
//! Names are the primary access path in URLs; a miss is a clean `not_found`
//! rather than a fault. Collisions resolve first-match-wins by ascending id
//! inside the repositories.

use crate::domain::ports::map_persistence_error;
use crate::domain::{Category, Error, Item};

use super::state::HttpState;

/// Fetch a category by display name or fail with `not_found`.
pub(crate) async fn find_category(state: &HttpState, name: &str) -> Result<Category, Error> {
    state
        .categories
        .find_by_name(name)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(|| Error::not_found(format!("no category named '{name}'")))
}

/// Fetch an item by display name or fail with `not_found`.
pub(crate) async fn find_item(state: &HttpState, name: &str) -> Result<Item, Error> {
    state
        .items
        .find_by_name(name)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(|| Error::not_found(format!("no item named '{name}'")))
}
