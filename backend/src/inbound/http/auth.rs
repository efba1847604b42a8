//! Login flow handlers: anti-forgery token, code exchange, disconnect.
//!
//! The status ladder on `/gconnect` matters: the state check rejects the
//! request before any call leaves the process, exchange and identity
//! mismatches are 401s, and provider-reported validation faults are 500s.

use actix_web::{get, post, web, HttpResponse};
use askama::Template;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::ports::{map_persistence_error, IdentityProviderError};
use crate::domain::{generate_state_token, Error, NewUser, SessionIdentity, User};

use super::guard::redirect_to_catalog;
use super::render::{page_chrome, render};
use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage {
    flashes: Vec<String>,
    logged_in: bool,
    state: String,
    client_id: String,
}

/// Issue an anti-forgery token and render the login page around it.
#[get("/login")]
pub async fn show_login(
    session: SessionContext,
    http_state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let token = generate_state_token();
    session.set_state_token(&token)?;
    let (flashes, logged_in) = page_chrome(&session)?;
    render(&LoginPage {
        flashes,
        logged_in,
        state: token,
        client_id: http_state.client_id.clone(),
    })
}

#[derive(Debug, Deserialize)]
pub struct GconnectQuery {
    state: Option<String>,
}

#[derive(Template)]
#[template(path = "welcome.html")]
struct WelcomePage {
    username: String,
    picture: String,
}

fn map_provider_error(err: IdentityProviderError) -> Error {
    match err {
        IdentityProviderError::Exchange { message } => {
            debug!(%message, "authorization code exchange failed");
            Error::unauthorized("Failed to upgrade the authorization code.")
        }
        IdentityProviderError::Validation { message } => Error::internal(message),
        IdentityProviderError::Revocation { status } => {
            Error::internal(format!("unexpected revocation failure (status {status})"))
        }
        IdentityProviderError::Network { message } => Error::internal(message),
    }
}

/// Exchange an authorization code for a session identity.
#[post("/gconnect")]
pub async fn gconnect(
    session: SessionContext,
    http_state: web::Data<HttpState>,
    query: web::Query<GconnectQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    // Anti-CSRF: reject before any external call is made.
    let expected = session.state_token()?;
    if expected.is_none() || query.into_inner().state != expected {
        return Err(Error::unauthorized("Invalid state parameter."));
    }

    let code = std::str::from_utf8(&body)
        .map_err(|_| Error::invalid_request("authorization code must be UTF-8"))?
        .trim()
        .to_owned();
    if code.is_empty() {
        return Err(Error::invalid_request("missing authorization code"));
    }

    let exchanged = http_state
        .identity
        .exchange_code(&code)
        .await
        .map_err(map_provider_error)?;
    let info = http_state
        .identity
        .verify_token(&exchanged.access_token)
        .await
        .map_err(map_provider_error)?;
    if info.user_id != exchanged.subject {
        return Err(Error::unauthorized(
            "Token's user ID doesn't match given user ID.",
        ));
    }
    if info.issued_to != http_state.client_id {
        return Err(Error::unauthorized(
            "Token's client ID does not match app's.",
        ));
    }

    // Idempotent short-circuit: a second login for the same identity must
    // not provision a duplicate user.
    if let Some(existing) = session.identity()? {
        if existing.provider_id == exchanged.subject {
            return Ok(HttpResponse::Ok().json("Current user is already connected."));
        }
    }

    let profile = http_state
        .identity
        .fetch_profile(&exchanged.access_token)
        .await
        .map_err(map_provider_error)?;
    let user = match http_state
        .users
        .find_by_email(&profile.email)
        .await
        .map_err(map_persistence_error)?
    {
        Some(user) => user,
        None => provision_user(&http_state, &profile).await?,
    };

    let identity = SessionIdentity {
        access_token: exchanged.access_token,
        provider_id: exchanged.subject,
        username: profile.name,
        picture: profile.picture.unwrap_or_default(),
        email: profile.email,
        user_id: user.id,
    };
    session.set_identity(&identity)?;
    session.flash(format!("you are now logged in as {}", identity.username))?;
    info!(user_id = %identity.user_id, "login completed");
    render(&WelcomePage {
        username: identity.username.clone(),
        picture: identity.picture.clone(),
    })
}

async fn provision_user(
    http_state: &HttpState,
    profile: &crate::domain::Profile,
) -> Result<User, Error> {
    let new_user = NewUser::try_from_profile(
        profile.name.clone(),
        profile.email.clone(),
        profile.picture.clone().unwrap_or_default(),
    )
    .map_err(|err| Error::internal(format!("provider returned an unusable profile: {err}")))?;
    let user = http_state
        .users
        .create(&new_user)
        .await
        .map_err(map_persistence_error)?;
    info!(user_id = %user.id, "provisioned user on first login");
    Ok(user)
}

/// Revoke the stored access token and clear the session identity.
#[get("/gdisconnect")]
pub async fn gdisconnect(
    session: SessionContext,
    http_state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let Some(identity) = session.identity()? else {
        return Err(Error::unauthorized("Current user not connected."));
    };
    match http_state.identity.revoke(&identity.access_token).await {
        Ok(()) => {
            session.clear_identity();
            session.flash("You are now logged out.")?;
            Ok(redirect_to_catalog())
        }
        Err(IdentityProviderError::Revocation { status }) => {
            // Leave the session untouched so the user can retry.
            debug!(status, "token revocation refused");
            Ok(HttpResponse::BadRequest().json("Failed to revoke token for given user."))
        }
        Err(err) => Err(map_provider_error(err)),
    }
}
