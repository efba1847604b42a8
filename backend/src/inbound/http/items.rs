//! Item CRUD handlers.
//!
//! Creation stamps the current time and binds the item to the selected
//! category and the acting user. On edit, a field left blank keeps the
//! stored value; the modification stamp is always refreshed and the
//! redirect lands on the item's (possibly new) category page.

use actix_web::http::header;
use actix_web::{get, post, web, HttpResponse};
use askama::Template;
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::domain::ports::map_persistence_error;
use crate::domain::{Category, CategoryId, EntryName, Error, Item, ItemChanges, NewItem};

use super::guard::{deny_unless_owner, redirect_to_catalog, RequireLogin};
use super::lookup::find_item;
use super::render::{page_chrome, render};
use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

/// Form payload for item create and edit.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    pub picture: String,
    pub category: String,
}

#[derive(Template)]
#[template(path = "item_add.html")]
struct AddItemPage {
    flashes: Vec<String>,
    logged_in: bool,
    categories: Vec<Category>,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "item_edit.html")]
struct EditItemPage {
    flashes: Vec<String>,
    logged_in: bool,
    categories: Vec<Category>,
    item: Item,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "item_delete.html")]
struct DeleteItemPage {
    flashes: Vec<String>,
    logged_in: bool,
    item_name: String,
    error: Option<String>,
}

async fn all_categories(state: &HttpState) -> Result<Vec<Category>, Error> {
    state.categories.list().await.map_err(map_persistence_error)
}

#[get("/catalog/add")]
pub async fn add_item_form(
    _auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let categories = all_categories(&state).await?;
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&AddItemPage {
        flashes,
        logged_in,
        categories,
        error: None,
    })
}

#[post("/catalog/add")]
pub async fn add_item(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    form: web::Form<ItemForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();

    let rerender = |session: &SessionContext, categories: Vec<Category>, message: String| {
        let (flashes, logged_in) = page_chrome(session)?;
        render(&AddItemPage {
            flashes,
            logged_in,
            categories,
            error: Some(message),
        })
    };

    let name = match EntryName::new(form.name) {
        Ok(name) => name,
        Err(err) => {
            let categories = all_categories(&state).await?;
            return rerender(&session, categories, err.to_string());
        }
    };
    let Some(category) = state
        .categories
        .find_by_name(&form.category)
        .await
        .map_err(map_persistence_error)?
    else {
        let categories = all_categories(&state).await?;
        let message = format!("no category named '{}'", form.category);
        return rerender(&session, categories, message);
    };

    let new_item = NewItem {
        name,
        description: form.description,
        picture: form.picture,
        date: Utc::now().naive_utc(),
        category_id: category.id,
        user_id: auth.0.user_id,
    };
    match state.items.create(&new_item).await {
        Ok(_) => {
            session.flash("Item Successfully Added!")?;
            Ok(redirect_to_catalog())
        }
        Err(err) => {
            warn!(%err, "item insert failed");
            let categories = all_categories(&state).await?;
            rerender(&session, categories, map_persistence_error(err).message().to_owned())
        }
    }
}

#[get("/item/{item_name}/edit")]
pub async fn edit_item_form(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let item = find_item(&state, &path.into_inner()).await?;
    if let Some(denied) = deny_unless_owner(
        &session,
        state.users.as_ref(),
        auth.0.user_id,
        item.user_id,
        "edit",
        "item",
    )
    .await?
    {
        return Ok(denied);
    }
    let categories = all_categories(&state).await?;
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&EditItemPage {
        flashes,
        logged_in,
        categories,
        item,
        error: None,
    })
}

#[post("/item/{item_name}/edit")]
pub async fn edit_item(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    form: web::Form<ItemForm>,
) -> ApiResult<HttpResponse> {
    let item = find_item(&state, &path.into_inner()).await?;
    if let Some(denied) = deny_unless_owner(
        &session,
        state.users.as_ref(),
        auth.0.user_id,
        item.user_id,
        "edit",
        "item",
    )
    .await?
    {
        return Ok(denied);
    }
    let form = form.into_inner();

    let rerender = |session: &SessionContext,
                    categories: Vec<Category>,
                    item: Item,
                    message: String| {
        let (flashes, logged_in) = page_chrome(session)?;
        render(&EditItemPage {
            flashes,
            logged_in,
            categories,
            item,
            error: Some(message),
        })
    };

    // Blank fields keep the stored value.
    let name = if form.name.trim().is_empty() {
        None
    } else {
        match EntryName::new(form.name) {
            Ok(name) => Some(name),
            Err(err) => {
                let categories = all_categories(&state).await?;
                return rerender(&session, categories, item, err.to_string());
            }
        }
    };
    let category = if form.category.trim().is_empty() {
        None
    } else {
        match state
            .categories
            .find_by_name(&form.category)
            .await
            .map_err(map_persistence_error)?
        {
            Some(category) => Some(category),
            None => {
                let categories = all_categories(&state).await?;
                let message = format!("no category named '{}'", form.category);
                return rerender(&session, categories, item, message);
            }
        }
    };

    let changes = ItemChanges {
        name,
        description: (!form.description.trim().is_empty()).then_some(form.description),
        picture: (!form.picture.trim().is_empty()).then_some(form.picture),
        category_id: category.as_ref().map(|c| c.id),
        date: Utc::now().naive_utc(),
    };
    match state.items.update(item.id, &changes).await {
        Ok(updated) => {
            session.flash("Item Successfully Edited!")?;
            let category_name = match category {
                Some(category) => category.name,
                None => category_name_of(&state, updated.category_id).await?,
            };
            Ok(redirect_to_category(&category_name))
        }
        Err(err) => {
            warn!(%err, "item update failed");
            let categories = all_categories(&state).await?;
            rerender(&session, categories, item, map_persistence_error(err).message().to_owned())
        }
    }
}

async fn category_name_of(state: &HttpState, id: CategoryId) -> Result<String, Error> {
    state
        .categories
        .find_by_id(id)
        .await
        .map_err(map_persistence_error)?
        .map(|category| category.name)
        .ok_or_else(|| Error::internal(format!("item references missing category {id}")))
}

fn redirect_to_category(name: &str) -> HttpResponse {
    let location = format!("/catalog/{}/items/", urlencoding::encode(name));
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[get("/item/{item_name}/delet")]
pub async fn delete_item_form(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let item = find_item(&state, &path.into_inner()).await?;
    if let Some(denied) = deny_unless_owner(
        &session,
        state.users.as_ref(),
        auth.0.user_id,
        item.user_id,
        "delete",
        "item",
    )
    .await?
    {
        return Ok(denied);
    }
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&DeleteItemPage {
        flashes,
        logged_in,
        item_name: item.name,
        error: None,
    })
}

#[post("/item/{item_name}/delet")]
pub async fn delete_item(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let item = find_item(&state, &path.into_inner()).await?;
    if let Some(denied) = deny_unless_owner(
        &session,
        state.users.as_ref(),
        auth.0.user_id,
        item.user_id,
        "delete",
        "item",
    )
    .await?
    {
        return Ok(denied);
    }
    match state.items.delete(item.id).await {
        Ok(()) => {
            session.flash(format!("Item Successfully Deleted! {}", item.name))?;
            Ok(redirect_to_catalog())
        }
        Err(err) => {
            warn!(%err, "item delete failed");
            let (flashes, logged_in) = page_chrome(&session)?;
            render(&DeleteItemPage {
                flashes,
                logged_in,
                item_name: item.name,
                error: Some(map_persistence_error(err).message().to_owned()),
            })
        }
    }
}
