//! Catalog entities: categories and the items they contain.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Stable category identifier (relational surrogate key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i32);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable item identifier (relational surrogate key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum length accepted for category and item display names.
pub const ENTRY_NAME_MAX: usize = 80;

/// Validation failures for user-submitted entry names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryNameError {
    #[error("name must not be empty")]
    Empty,
    #[error("name must be at most {max} characters")]
    TooLong { max: usize },
}

/// Validated display name for a category or item.
///
/// Names are trimmed of surrounding whitespace and are the primary lookup key
/// in URLs, so an empty or whitespace-only name is rejected before it ever
/// reaches persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryName(String);

impl EntryName {
    /// Validate and construct an [`EntryName`].
    pub fn new(name: impl Into<String>) -> Result<Self, EntryNameError> {
        let trimmed = name.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(EntryNameError::Empty);
        }
        if trimmed.chars().count() > ENTRY_NAME_MAX {
            return Err(EntryNameError::TooLong {
                max: ENTRY_NAME_MAX,
            });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EntryName> for String {
    fn from(value: EntryName) -> Self {
        value.0
    }
}

impl TryFrom<String> for EntryName {
    type Error = EntryNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Category as stored. Every category has exactly one owning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub user_id: UserId,
}

/// Category to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: EntryName,
    pub user_id: UserId,
}

/// Item as stored. Every item belongs to exactly one category and has exactly
/// one owning user; `date` is the last-modified stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub picture: String,
    pub date: NaiveDateTime,
    pub category_id: CategoryId,
    pub user_id: UserId,
}

/// Item to insert, stamped with its creation time and creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: EntryName,
    pub description: String,
    pub picture: String,
    pub date: NaiveDateTime,
    pub category_id: CategoryId,
    pub user_id: UserId,
}

/// Field updates for an item edit.
///
/// `None` keeps the stored value; the modification stamp is always refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: Option<EntryName>,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub category_id: Option<CategoryId>,
    pub date: NaiveDateTime,
}
