//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the embedded migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Users provisioned on first login.
    users (id) {
        id -> Integer,
        name -> Text,
        email -> Text,
        picture -> Text,
    }
}

diesel::table! {
    /// Catalog categories; `name` is unique.
    categories (id) {
        id -> Integer,
        name -> Text,
        user_id -> Integer,
    }
}

diesel::table! {
    /// Catalog items; `date` is the last-modified stamp.
    items (id) {
        id -> Integer,
        name -> Text,
        description -> Text,
        picture -> Text,
        date -> Timestamp,
        category_id -> Integer,
        user_id -> Integer,
    }
}

diesel::joinable!(categories -> users (user_id));
diesel::joinable!(items -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(users, categories, items);
