//! Template rendering helpers shared by the page handlers.

use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use askama::Template;

use crate::domain::Error;

use super::session::SessionContext;

/// Render a template into an HTML response.
pub(crate) fn render<T: Template>(template: &T) -> Result<HttpResponse, Error> {
    let body = template
        .render()
        .map_err(|err| Error::internal(format!("template render failed: {err}")))?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

/// Drain the page chrome from the session: pending flash messages and
/// whether the visitor is logged in.
pub(crate) fn page_chrome(session: &SessionContext) -> Result<(Vec<String>, bool), Error> {
    let logged_in = session.identity()?.is_some();
    Ok((session.take_flashes(), logged_in))
}
