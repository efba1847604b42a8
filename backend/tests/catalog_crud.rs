//! Two-phase CRUD flows over categories and items.

mod support;

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web};

use catalog_backend::inbound::http::test_utils::test_session_middleware;
use catalog_backend::server::build_app;
use catalog_backend::test_support::{in_memory_state, InMemoryCatalog, StubIdentityProvider};

use support::{body_text, login, session_cookie, CLIENT_ID};

fn ada_provider() -> StubIdentityProvider {
    StubIdentityProvider::happy("108246", CLIENT_ID, "Ada Lovelace", "ada@example.com")
}

fn seeded_state() -> (web::Data<catalog_backend::inbound::http::state::HttpState>, Arc<InMemoryCatalog>) {
    let (state, catalog) = in_memory_state(Arc::new(ada_provider()), CLIENT_ID);
    catalog.seed_user("Ada Lovelace", "ada@example.com");
    (web::Data::new(state), catalog)
}

fn location_of<B>(res: &actix_web::dev::ServiceResponse<B>) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

#[actix_web::test]
async fn category_create_flow_flashes_and_redirects() {
    let (state, catalog) = seeded_state();
    let app = test::init_service(build_app(state, test_session_middleware())).await;
    let ada = login(&app).await;

    let form = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/catalog/addcategory")
            .cookie(ada.clone())
            .to_request(),
    )
    .await;
    assert_eq!(form.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/addcategory")
            .cookie(ada)
            .set_form([("name", "Fire")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location_of(&res), Some("/catalog/"));
    let cookie = session_cookie(&res).expect("flash queued");

    let categories = catalog.categories();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Fire");
    assert_eq!(categories[0].user_id, catalog.users()[0].id);

    let home = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/catalog/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body = body_text(home).await;
    assert!(body.contains("Category Successfully Added!"));
    assert!(body.contains("Fire"));
}

#[actix_web::test]
async fn duplicate_category_re_renders_the_form_with_the_error() {
    let (state, catalog) = seeded_state();
    let app = test::init_service(build_app(state, test_session_middleware())).await;
    let ada = login(&app).await;

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/addcategory")
            .cookie(ada.clone())
            .set_form([("name", "Fire")])
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&first).unwrap_or(ada);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/addcategory")
            .cookie(cookie)
            .set_form([("name", "Fire")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "form re-render, no redirect");
    let body = body_text(res).await;
    assert!(body.contains("already taken"));
    assert_eq!(catalog.categories().len(), 1);
}

#[actix_web::test]
async fn blank_category_name_is_rejected_before_persistence() {
    let (state, catalog) = seeded_state();
    let app = test::init_service(build_app(state, test_session_middleware())).await;
    let ada = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/addcategory")
            .cookie(ada)
            .set_form([("name", "   ")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("name must not be empty"));
    assert!(catalog.categories().is_empty());
}

#[actix_web::test]
async fn category_edit_and_delete_round_trip() {
    let (state, catalog) = seeded_state();
    let app = test::init_service(build_app(state, test_session_middleware())).await;
    let ada = login(&app).await;
    let owner = catalog.users()[0].id;
    catalog.seed_category("Fire", owner);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/Fire/edit")
            .cookie(ada.clone())
            .set_form([("name", "Flame")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(catalog.categories()[0].name, "Flame");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/Flame/delete")
            .cookie(ada)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location_of(&res), Some("/catalog/"));
    assert!(catalog.categories().is_empty());
}

#[actix_web::test]
async fn item_create_binds_category_creator_and_timestamp() {
    let (state, catalog) = seeded_state();
    let app = test::init_service(build_app(state, test_session_middleware())).await;
    let ada = login(&app).await;
    let owner = catalog.users()[0].id;
    let fire = catalog.seed_category("Fire", owner);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/add")
            .cookie(ada)
            .set_form([
                ("name", "Charmander"),
                ("description", "A fire lizard"),
                ("picture", "https://example.com/char.png"),
                ("category", "Fire"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location_of(&res), Some("/catalog/"));

    let items = catalog.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Charmander");
    assert_eq!(items[0].category_id, fire.id);
    assert_eq!(items[0].user_id, owner);
}

#[actix_web::test]
async fn item_create_with_unknown_category_re_renders_the_form() {
    let (state, catalog) = seeded_state();
    let app = test::init_service(build_app(state, test_session_middleware())).await;
    let ada = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/add")
            .cookie(ada)
            .set_form([
                ("name", "Charmander"),
                ("description", "A fire lizard"),
                ("picture", ""),
                ("category", "Nowhere"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("no category named"));
    assert!(catalog.items().is_empty());
}

#[actix_web::test]
async fn item_edit_keeps_blank_fields_and_redirects_to_the_category() {
    let (state, catalog) = seeded_state();
    let app = test::init_service(build_app(state, test_session_middleware())).await;
    let ada = login(&app).await;
    let owner = catalog.users()[0].id;
    let fire = catalog.seed_category("Fire", owner);
    let before = catalog.seed_item("Charmander", fire.id, owner);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/item/Charmander/edit")
            .cookie(ada)
            .set_form([
                ("name", "Charmeleon"),
                ("description", ""),
                ("picture", ""),
                ("category", ""),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location_of(&res), Some("/catalog/Fire/items/"));

    let items = catalog.items();
    assert_eq!(items[0].name, "Charmeleon");
    assert_eq!(items[0].description, before.description, "blank keeps stored");
    assert_eq!(items[0].category_id, fire.id);
    assert!(items[0].date >= before.date, "modification stamp refreshed");
}

#[actix_web::test]
async fn item_edit_can_move_between_categories() {
    let (state, catalog) = seeded_state();
    let app = test::init_service(build_app(state, test_session_middleware())).await;
    let ada = login(&app).await;
    let owner = catalog.users()[0].id;
    let fire = catalog.seed_category("Fire", owner);
    catalog.seed_category("Water", owner);
    catalog.seed_item("Vaporeon", fire.id, owner);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/item/Vaporeon/edit")
            .cookie(ada)
            .set_form([
                ("name", ""),
                ("description", ""),
                ("picture", ""),
                ("category", "Water"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location_of(&res), Some("/catalog/Water/items/"));
    let water = catalog
        .categories()
        .into_iter()
        .find(|c| c.name == "Water")
        .expect("water exists");
    assert_eq!(catalog.items()[0].category_id, water.id);
}

#[actix_web::test]
async fn item_delete_flow_flashes_the_item_name() {
    let (state, catalog) = seeded_state();
    let app = test::init_service(build_app(state, test_session_middleware())).await;
    let ada = login(&app).await;
    let owner = catalog.users()[0].id;
    let fire = catalog.seed_category("Fire", owner);
    catalog.seed_item("Charmander", fire.id, owner);

    let confirm = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/item/Charmander/delet")
            .cookie(ada.clone())
            .to_request(),
    )
    .await;
    assert_eq!(confirm.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/item/Charmander/delet")
            .cookie(ada)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let cookie = session_cookie(&res).expect("flash queued");
    assert!(catalog.items().is_empty());

    let home = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/catalog/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body = body_text(home).await;
    assert!(body.contains("Item Successfully Deleted! Charmander"));
}
