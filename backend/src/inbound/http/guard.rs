//! Authorization guards applied by the HTTP handlers.
//!
//! Two gates exist: the authentication gate (mutating routes bounce
//! anonymous visitors to `/login` before any other logic runs) and the
//! ownership gate (edit/delete is only attempted by the resource owner;
//! anyone else is flashed a notice naming the true owner and sent home).

use std::fmt;

use actix_web::http::{header, StatusCode};
use actix_web::{dev::Payload, FromRequest, HttpRequest, HttpResponse, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::{map_persistence_error, UserRepository};
use crate::domain::{Error, SessionIdentity, UserId};

use super::session::SessionContext;

/// Extractor for routes that require an authenticated session.
///
/// Fails with a redirect to `/login`, so guarded handlers never run for
/// anonymous requests.
pub struct RequireLogin(pub SessionIdentity);

/// Rejection raised when the authentication gate fails.
#[derive(Debug)]
pub struct LoginRedirect;

impl fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("login required")
    }
}

impl ResponseError for LoginRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, "/login"))
            .finish()
    }
}

impl FromRequest for RequireLogin {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = fut.await?;
            match session.identity() {
                Ok(Some(identity)) => Ok(RequireLogin(identity)),
                Ok(None) => Err(LoginRedirect.into()),
                Err(err) => Err(err.into()),
            }
        })
    }
}

/// Apply the ownership gate for an edit or delete.
///
/// Returns `Some(response)` when the acting user is not the owner: a flash
/// message naming the true owner is queued and the caller must return the
/// redirect untouched, never attempting the mutation.
pub async fn deny_unless_owner(
    session: &SessionContext,
    users: &dyn UserRepository,
    acting: UserId,
    owner: UserId,
    verb: &str,
    kind: &str,
) -> Result<Option<HttpResponse>, Error> {
    if acting == owner {
        return Ok(None);
    }
    let owner_name = users
        .find_by_id(owner)
        .await
        .map_err(map_persistence_error)?
        .map_or_else(|| "another user".to_owned(), |user| user.name);
    session.flash(format!(
        "You cannot {verb} this {kind}. This {kind} belongs to {owner_name}."
    ))?;
    Ok(Some(redirect_to_catalog()))
}

/// Redirect to the catalog home page.
pub fn redirect_to_catalog() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/catalog/"))
        .finish()
}
