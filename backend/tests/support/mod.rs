//! Shared helpers for the integration suites.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;

use catalog_backend::domain::STATE_TOKEN_LEN;

/// Client id the stub provider issues tokens to.
pub const CLIENT_ID: &str = "catalog-client.apps.example";

/// Extract the (possibly refreshed) session cookie from a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
}

/// Pull the anti-forgery token out of the rendered login page.
pub fn state_token_from(body: &str) -> String {
    let marker = "data-state=\"";
    let start = body.find(marker).expect("login page embeds the state token") + marker.len();
    body[start..start + STATE_TOKEN_LEN].to_owned()
}

/// Read a response body as UTF-8 text.
pub async fn body_text<B>(res: ServiceResponse<B>) -> String
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    String::from_utf8(test::read_body(res).await.to_vec()).expect("utf-8 body")
}

/// Run the full login flow against the app, returning the authenticated
/// session cookie.
pub async fn login<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let login_res =
        test::call_service(app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&login_res).expect("login page sets session cookie");
    let body = body_text(login_res).await;
    let token = state_token_from(&body);

    let connect_res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/gconnect?state={token}"))
            .cookie(cookie)
            .set_payload("stub-authorization-code")
            .to_request(),
    )
    .await;
    assert!(
        connect_res.status().is_success(),
        "gconnect failed with status {}",
        connect_res.status()
    );
    session_cookie(&connect_res).expect("gconnect refreshes the session cookie")
}
