//! Read-only catalog pages.
//!
//! Ownership only changes presentation here: owners see management links,
//! everyone else a read-only rendering of the same data.

use actix_web::{get, web, HttpResponse};
use askama::Template;

use crate::domain::ports::map_persistence_error;
use crate::domain::{Category, Item};

use super::lookup::{find_category, find_item};
use super::render::{page_chrome, render};
use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

/// How many recently modified items the home page shows.
const RECENT_ITEM_LIMIT: i64 = 10;

struct LatestEntry {
    item_name: String,
    category_name: String,
}

#[derive(Template)]
#[template(path = "catalog.html")]
struct CatalogPage {
    flashes: Vec<String>,
    logged_in: bool,
    categories: Vec<Category>,
    latest: Vec<LatestEntry>,
}

/// Full catalog listing, served at both `/` and `/catalog/`.
pub async fn catalog_home(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let categories = state.categories.list().await.map_err(map_persistence_error)?;
    let latest = state
        .items
        .list_recent(RECENT_ITEM_LIMIT)
        .await
        .map_err(map_persistence_error)?
        .into_iter()
        .map(|(item, category)| LatestEntry {
            item_name: item.name,
            category_name: category.name,
        })
        .collect();
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&CatalogPage {
        flashes,
        logged_in,
        categories,
        latest,
    })
}

#[derive(Template)]
#[template(path = "category_items.html")]
struct CategoryItemsPage {
    flashes: Vec<String>,
    logged_in: bool,
    category_name: String,
    items: Vec<Item>,
    count: i64,
    owner: bool,
}

/// Items within one category.
#[get("/catalog/{category_name}/items/")]
pub async fn show_category(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let category = find_category(&state, &path.into_inner()).await?;
    let items = state
        .items
        .list_for_category(category.id)
        .await
        .map_err(map_persistence_error)?;
    let count = state
        .items
        .count_for_category(category.id)
        .await
        .map_err(map_persistence_error)?;
    let owner = session
        .identity()?
        .is_some_and(|identity| identity.user_id == category.user_id);
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&CategoryItemsPage {
        flashes,
        logged_in,
        category_name: category.name,
        items,
        count,
        owner,
    })
}

#[derive(Template)]
#[template(path = "item_detail.html")]
struct ItemDetailPage {
    flashes: Vec<String>,
    logged_in: bool,
    category_name: String,
    item: Item,
    creator_name: String,
    owner: bool,
}

/// Item detail page.
#[get("/catalog/{category_name}/{item_name}/")]
pub async fn show_item(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (category_name, item_name) = path.into_inner();
    let item = find_item(&state, &item_name).await?;
    let creator_name = state
        .users
        .find_by_id(item.user_id)
        .await
        .map_err(map_persistence_error)?
        .map_or_else(|| "an unknown user".to_owned(), |user| user.name);
    let owner = session
        .identity()?
        .is_some_and(|identity| identity.user_id == item.user_id);
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&ItemDetailPage {
        flashes,
        logged_in,
        category_name,
        item,
        creator_name,
        owner,
    })
}
