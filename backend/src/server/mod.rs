//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};

use crate::inbound::http::auth::{gconnect, gdisconnect, show_login};
use crate::inbound::http::categories::{
    add_category, add_category_form, delete_category, delete_category_form, edit_category,
    edit_category_form,
};
use crate::inbound::http::export::catalog_json;
use crate::inbound::http::items::{
    add_item, add_item_form, delete_item, delete_item_form, edit_item, edit_item_form,
};
use crate::inbound::http::pages::{catalog_home, show_category, show_item};
use crate::inbound::http::state::HttpState;

/// Build the cookie-session middleware shared by every route.
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(same_site)
        .build()
}

/// Assemble the application with every route registered.
///
/// Literal paths are registered ahead of the parameterised catalog routes so
/// a category named `addcategory` cannot shadow them.
pub fn build_app(
    state: web::Data<HttpState>,
    session: SessionMiddleware<CookieSessionStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(session)
        .service(show_login)
        .service(gconnect)
        .service(gdisconnect)
        .service(catalog_json)
        .service(add_category_form)
        .service(add_category)
        .service(add_item_form)
        .service(add_item)
        .service(edit_category_form)
        .service(edit_category)
        .service(delete_category_form)
        .service(delete_category)
        .service(edit_item_form)
        .service(edit_item)
        .service(delete_item_form)
        .service(delete_item)
        .service(show_category)
        .service(show_item)
        .route("/", web::get().to(catalog_home))
        .route("/catalog/", web::get().to(catalog_home))
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        state,
    } = config;
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        build_app(
            state.clone(),
            session_middleware(key.clone(), cookie_secure, same_site),
        )
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
