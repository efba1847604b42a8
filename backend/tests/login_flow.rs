//! Login flow behaviour: anti-forgery, provisioning, idempotent reconnect,
//! and disconnect.

mod support;

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web};

use catalog_backend::inbound::http::test_utils::test_session_middleware;
use catalog_backend::server::build_app;
use catalog_backend::test_support::{in_memory_state, StubIdentityProvider};

use support::{body_text, login, session_cookie, state_token_from, CLIENT_ID};

fn happy_provider() -> StubIdentityProvider {
    StubIdentityProvider::happy("108246", CLIENT_ID, "Ada Lovelace", "ada@example.com")
}

#[actix_web::test]
async fn mismatched_state_is_rejected_and_writes_no_identity() {
    let (state, catalog) = in_memory_state(Arc::new(happy_provider()), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let login_res =
        test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&login_res).expect("session cookie");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/gconnect?state=WRONGWRONGWRONGWRONGWRONGWRONG12")
            .cookie(cookie.clone())
            .set_payload("stub-authorization-code")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // No identity was bound: disconnect still reports not connected, and no
    // user row was provisioned.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/gdisconnect")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(catalog.users().is_empty());
}

#[actix_web::test]
async fn gconnect_without_a_pending_state_token_is_rejected() {
    let (state, _catalog) = in_memory_state(Arc::new(happy_provider()), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/gconnect?state=ANYTHING")
            .set_payload("stub-authorization-code")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn failed_code_exchange_is_unauthorized() {
    let provider = happy_provider().with_exchange_failure("invalid_grant");
    let (state, _catalog) = in_memory_state(Arc::new(provider), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let login_res =
        test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&login_res).expect("session cookie");
    let token = state_token_from(&body_text(login_res).await);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/gconnect?state={token}"))
            .cookie(cookie)
            .set_payload("expired-code")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn provider_reported_validation_error_is_a_server_error() {
    let provider = happy_provider().with_validation_failure("token expired");
    let (state, _catalog) = in_memory_state(Arc::new(provider), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let login_res =
        test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&login_res).expect("session cookie");
    let token = state_token_from(&body_text(login_res).await);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/gconnect?state={token}"))
            .cookie(cookie)
            .set_payload("stub-authorization-code")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn subject_and_audience_mismatches_are_unauthorized() {
    for provider in [
        happy_provider().with_token_info("someone-else", CLIENT_ID),
        happy_provider().with_token_info("108246", "other-client.apps.example"),
    ] {
        let (state, catalog) = in_memory_state(Arc::new(provider), CLIENT_ID);
        let app =
            test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

        let login_res =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&login_res).expect("session cookie");
        let token = state_token_from(&body_text(login_res).await);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/gconnect?state={token}"))
                .cookie(cookie)
                .set_payload("stub-authorization-code")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(catalog.users().is_empty());
    }
}

#[actix_web::test]
async fn first_login_provisions_a_user_with_the_provider_profile() {
    let (state, catalog) = in_memory_state(Arc::new(happy_provider()), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let login_res =
        test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&login_res).expect("session cookie");
    let token = state_token_from(&body_text(login_res).await);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/gconnect?state={token}"))
            .cookie(cookie)
            .set_payload("stub-authorization-code")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let authed = session_cookie(&res).expect("refreshed cookie");
    let body = body_text(res).await;
    assert!(body.contains("Welcome, Ada Lovelace!"));

    let users = catalog.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "ada@example.com");
    assert_eq!(users[0].name, "Ada Lovelace");
    assert_eq!(users[0].picture, "https://example.com/avatar.png");

    // The next page render drains the login flash and shows the logout link.
    let home = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/catalog/")
            .cookie(authed)
            .to_request(),
    )
    .await;
    let body = body_text(home).await;
    assert!(body.contains("you are now logged in as Ada Lovelace"));
    assert!(body.contains("/gdisconnect"));
}

#[actix_web::test]
async fn second_login_for_the_same_identity_short_circuits() {
    let (state, catalog) = in_memory_state(Arc::new(happy_provider()), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let authed = login(&app).await;
    assert_eq!(catalog.users().len(), 1);

    // A fresh state token on the same session, then a second exchange.
    let login_res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/login")
            .cookie(authed)
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login_res).expect("session cookie");
    let token = state_token_from(&body_text(login_res).await);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/gconnect?state={token}"))
            .cookie(cookie)
            .set_payload("stub-authorization-code")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("already connected"));
    assert_eq!(catalog.users().len(), 1, "no duplicate user row");
}

#[actix_web::test]
async fn gdisconnect_without_a_token_is_unauthorized() {
    let (state, _catalog) = in_memory_state(Arc::new(happy_provider()), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/gdisconnect").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn gdisconnect_revokes_and_returns_to_anonymous() {
    let (state, catalog) = in_memory_state(Arc::new(happy_provider()), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let authed = login(&app).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/gdisconnect")
            .cookie(authed)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/catalog/")
    );
    let cleared = session_cookie(&res).expect("refreshed cookie");

    let home = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/catalog/")
            .cookie(cleared.clone())
            .to_request(),
    )
    .await;
    let body = body_text(home).await;
    assert!(body.contains("You are now logged out."));
    assert!(body.contains("/login"));

    // Mutations now bounce to /login again.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/addcategory")
            .cookie(cleared)
            .set_form([("name", "Fire")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(catalog.categories().is_empty());
}

#[actix_web::test]
async fn failed_revocation_leaves_the_session_untouched() {
    let provider = happy_provider().with_revocation_failure(400);
    let (state, _catalog) = in_memory_state(Arc::new(provider), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let authed = login(&app).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/gdisconnect")
            .cookie(authed.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_text(res).await;
    assert!(body.contains("Failed to revoke token for given user."));

    // Still logged in.
    let home = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/catalog/")
            .cookie(authed)
            .to_request(),
    )
    .await;
    let body = body_text(home).await;
    assert!(body.contains("/gdisconnect"));
}
