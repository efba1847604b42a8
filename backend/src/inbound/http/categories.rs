//! Category CRUD handlers.
//!
//! Each mutation is two-phase: `GET` renders the form, `POST` applies the
//! change. Persistence failures re-render the form with the error inline;
//! success flashes a notice and redirects to the catalog home.

use actix_web::{get, post, web, HttpResponse};
use askama::Template;
use serde::Deserialize;
use tracing::warn;

use crate::domain::ports::map_persistence_error;
use crate::domain::{EntryName, NewCategory};

use super::guard::{deny_unless_owner, redirect_to_catalog, RequireLogin};
use super::lookup::find_category;
use super::render::{page_chrome, render};
use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

/// Form payload for category create and edit.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

#[derive(Template)]
#[template(path = "category_add.html")]
struct AddCategoryPage {
    flashes: Vec<String>,
    logged_in: bool,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "category_edit.html")]
struct EditCategoryPage {
    flashes: Vec<String>,
    logged_in: bool,
    category_name: String,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "category_delete.html")]
struct DeleteCategoryPage {
    flashes: Vec<String>,
    logged_in: bool,
    category_name: String,
    error: Option<String>,
}

#[get("/catalog/addcategory")]
pub async fn add_category_form(
    _auth: RequireLogin,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&AddCategoryPage {
        flashes,
        logged_in,
        error: None,
    })
}

#[post("/catalog/addcategory")]
pub async fn add_category(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    form: web::Form<CategoryForm>,
) -> ApiResult<HttpResponse> {
    let rerender = |session: &SessionContext, message: String| {
        let (flashes, logged_in) = page_chrome(session)?;
        render(&AddCategoryPage {
            flashes,
            logged_in,
            error: Some(message),
        })
    };

    let name = match EntryName::new(form.into_inner().name) {
        Ok(name) => name,
        Err(err) => return rerender(&session, err.to_string()),
    };
    match state
        .categories
        .create(&NewCategory {
            name,
            user_id: auth.0.user_id,
        })
        .await
    {
        Ok(_) => {
            session.flash("Category Successfully Added!")?;
            Ok(redirect_to_catalog())
        }
        Err(err) => {
            warn!(%err, "category insert failed");
            rerender(&session, map_persistence_error(err).message().to_owned())
        }
    }
}

#[get("/catalog/{category_name}/edit")]
pub async fn edit_category_form(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let category = find_category(&state, &path.into_inner()).await?;
    if let Some(denied) = deny_unless_owner(
        &session,
        state.users.as_ref(),
        auth.0.user_id,
        category.user_id,
        "edit",
        "category",
    )
    .await?
    {
        return Ok(denied);
    }
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&EditCategoryPage {
        flashes,
        logged_in,
        category_name: category.name,
        error: None,
    })
}

#[post("/catalog/{category_name}/edit")]
pub async fn edit_category(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    form: web::Form<CategoryForm>,
) -> ApiResult<HttpResponse> {
    let category = find_category(&state, &path.into_inner()).await?;
    if let Some(denied) = deny_unless_owner(
        &session,
        state.users.as_ref(),
        auth.0.user_id,
        category.user_id,
        "edit",
        "category",
    )
    .await?
    {
        return Ok(denied);
    }

    let rerender = |session: &SessionContext, message: String| {
        let (flashes, logged_in) = page_chrome(session)?;
        render(&EditCategoryPage {
            flashes,
            logged_in,
            category_name: category.name.clone(),
            error: Some(message),
        })
    };

    let name = match EntryName::new(form.into_inner().name) {
        Ok(name) => name,
        Err(err) => return rerender(&session, err.to_string()),
    };
    match state.categories.rename(category.id, &name).await {
        Ok(()) => {
            session.flash("Category Successfully Edited")?;
            Ok(redirect_to_catalog())
        }
        Err(err) => {
            warn!(%err, "category rename failed");
            rerender(&session, map_persistence_error(err).message().to_owned())
        }
    }
}

#[get("/catalog/{category_name}/delete")]
pub async fn delete_category_form(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let category = find_category(&state, &path.into_inner()).await?;
    if let Some(denied) = deny_unless_owner(
        &session,
        state.users.as_ref(),
        auth.0.user_id,
        category.user_id,
        "delete",
        "category",
    )
    .await?
    {
        return Ok(denied);
    }
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&DeleteCategoryPage {
        flashes,
        logged_in,
        category_name: category.name,
        error: None,
    })
}

#[post("/catalog/{category_name}/delete")]
pub async fn delete_category(
    auth: RequireLogin,
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let category = find_category(&state, &path.into_inner()).await?;
    if let Some(denied) = deny_unless_owner(
        &session,
        state.users.as_ref(),
        auth.0.user_id,
        category.user_id,
        "delete",
        "category",
    )
    .await?
    {
        return Ok(denied);
    }
    match state.categories.delete(category.id).await {
        Ok(()) => {
            session.flash("Category Successfully Deleted")?;
            Ok(redirect_to_catalog())
        }
        Err(err) => {
            warn!(%err, "category delete failed");
            let (flashes, logged_in) = page_chrome(&session)?;
            render(&DeleteCategoryPage {
                flashes,
                logged_in,
                category_name: category.name,
                error: Some(map_persistence_error(err).message().to_owned()),
            })
        }
    }
}
