//! Outbound persistence adapters backed by Diesel and SQLite.

mod diesel_category_repository;
mod diesel_helpers;
mod diesel_item_repository;
mod diesel_user_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError, MIGRATIONS};
