//! Row types mapping between the relational schema and domain entities.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::{Category, CategoryId, Item, ItemChanges, ItemId, User, UserId};

use super::schema::{categories, items, users};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub picture: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            name: row.name,
            email: row.email,
            picture: row.picture,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub picture: &'a str,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId(row.id),
            name: row.name,
            user_id: UserId(row.user_id),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow<'a> {
    pub name: &'a str,
    pub user_id: i32,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ItemRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub picture: String,
    pub date: NaiveDateTime,
    pub category_id: i32,
    pub user_id: i32,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: ItemId(row.id),
            name: row.name,
            description: row.description,
            picture: row.picture,
            date: row.date,
            category_id: CategoryId(row.category_id),
            user_id: UserId(row.user_id),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub struct NewItemRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub picture: &'a str,
    pub date: NaiveDateTime,
    pub category_id: i32,
    pub user_id: i32,
}

/// Changeset for item edits; `None` fields keep the stored value.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = items)]
pub struct ItemChangesRow {
    pub name: Option<String>,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub category_id: Option<i32>,
    pub date: NaiveDateTime,
}

impl From<&ItemChanges> for ItemChangesRow {
    fn from(changes: &ItemChanges) -> Self {
        Self {
            name: changes.name.as_ref().map(|name| name.as_ref().to_owned()),
            description: changes.description.clone(),
            picture: changes.picture.clone(),
            category_id: changes.category_id.map(|id| id.0),
            date: changes.date,
        }
    }
}
