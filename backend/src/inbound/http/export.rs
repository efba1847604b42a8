//! Read-only JSON export of the full catalog.

use actix_web::{get, web};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::ports::map_persistence_error;
use crate::domain::Item;

use super::state::HttpState;
use super::ApiResult;

#[derive(Debug, Serialize)]
pub struct ItemExport {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub picture: String,
    pub date: NaiveDateTime,
    pub category_id: i32,
    pub user_id: i32,
}

impl From<Item> for ItemExport {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.0,
            name: item.name,
            description: item.description,
            picture: item.picture,
            date: item.date,
            category_id: item.category_id.0,
            user_id: item.user_id.0,
        }
    }
}

/// One exported category. Categories without items omit the `Items` key
/// entirely rather than emitting an empty list; consumers rely on that
/// shape.
#[derive(Debug, Serialize)]
pub struct CategoryExport {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    #[serde(rename = "Items", skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ItemExport>>,
}

#[derive(Debug, Serialize)]
pub struct CatalogExport {
    #[serde(rename = "Category")]
    pub category: Vec<CategoryExport>,
}

/// Serialise the whole catalog, categories in ascending id order.
#[get("/catalog/JSON")]
pub async fn catalog_json(state: web::Data<HttpState>) -> ApiResult<web::Json<CatalogExport>> {
    let categories = state.categories.list().await.map_err(map_persistence_error)?;
    let mut exported = Vec::with_capacity(categories.len());
    for category in categories {
        let items = state
            .items
            .list_for_category(category.id)
            .await
            .map_err(map_persistence_error)?;
        let items = if items.is_empty() {
            None
        } else {
            Some(items.into_iter().map(ItemExport::from).collect())
        };
        exported.push(CategoryExport {
            id: category.id.0,
            name: category.name,
            user_id: category.user_id.0,
            items,
        });
    }
    Ok(web::Json(CatalogExport { category: exported }))
}
