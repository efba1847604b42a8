//! Shape of the read-only JSON export.

mod support;

use std::sync::Arc;

use actix_web::{test, web};
use serde_json::Value;

use catalog_backend::inbound::http::test_utils::test_session_middleware;
use catalog_backend::server::build_app;
use catalog_backend::test_support::{in_memory_state, StubIdentityProvider};

use support::{login, CLIENT_ID};

fn ada_provider() -> StubIdentityProvider {
    StubIdentityProvider::happy("108246", CLIENT_ID, "Ada Lovelace", "ada@example.com")
}

#[actix_web::test]
async fn created_entries_round_trip_through_the_export() {
    let (state, catalog) = in_memory_state(Arc::new(ada_provider()), CLIENT_ID);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;
    let ada = login(&app).await;
    let ada_id = catalog.users()[0].id;

    // Create a category through the handlers, then verify it exports.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/addcategory")
            .cookie(ada.clone())
            .set_form([("name", "Fire")])
            .to_request(),
    )
    .await;
    assert!(res.status().is_redirection());

    let export: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/catalog/JSON").to_request(),
    )
    .await;
    let categories = export["Category"].as_array().expect("category list");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Fire");
    assert_eq!(categories[0]["user_id"], ada_id.0);
    assert!(
        categories[0].get("Items").is_none(),
        "empty category omits the Items key"
    );

    // Nest an item under it and re-fetch.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/catalog/add")
            .cookie(ada.clone())
            .set_form([
                ("name", "Charmander"),
                ("description", "A fire lizard"),
                ("picture", ""),
                ("category", "Fire"),
            ])
            .to_request(),
    )
    .await;
    assert!(res.status().is_redirection());

    let export: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/catalog/JSON").to_request(),
    )
    .await;
    let categories = export["Category"].as_array().expect("category list");
    let items = categories[0]["Items"].as_array().expect("items nested");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Charmander");
    assert_eq!(items[0]["description"], "A fire lizard");
    assert_eq!(items[0]["category_id"], categories[0]["id"]);
    assert_eq!(items[0]["user_id"], ada_id.0);
}

#[actix_web::test]
async fn item_nests_under_its_own_category_only() {
    let (state, catalog) = in_memory_state(Arc::new(ada_provider()), CLIENT_ID);
    let ada_user = catalog.seed_user("Ada Lovelace", "ada@example.com");
    let fire = catalog.seed_category("Fire", ada_user.id);
    catalog.seed_category("Water", ada_user.id);
    catalog.seed_item("Charmander", fire.id, ada_user.id);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;

    let export: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/catalog/JSON").to_request(),
    )
    .await;
    let categories = export["Category"].as_array().expect("category list");
    assert_eq!(categories.len(), 2);
    // Ascending id order: Fire first.
    assert_eq!(categories[0]["name"], "Fire");
    assert_eq!(
        categories[0]["Items"].as_array().expect("fire items").len(),
        1
    );
    assert!(
        categories[1].get("Items").is_none(),
        "the other category stays bare"
    );
}

#[actix_web::test]
async fn deleting_the_only_item_removes_the_items_key_entirely() {
    let (state, catalog) = in_memory_state(Arc::new(ada_provider()), CLIENT_ID);
    let ada_user = catalog.seed_user("Ada Lovelace", "ada@example.com");
    let fire = catalog.seed_category("Fire", ada_user.id);
    catalog.seed_item("Charmander", fire.id, ada_user.id);
    let app =
        test::init_service(build_app(web::Data::new(state), test_session_middleware())).await;
    let ada = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/item/Charmander/delet")
            .cookie(ada)
            .to_request(),
    )
    .await;
    assert!(res.status().is_redirection());

    let export: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/catalog/JSON").to_request(),
    )
    .await;
    let categories = export["Category"].as_array().expect("category list");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Fire");
    assert!(
        categories[0].get("Items").is_none(),
        "no Items key rather than an empty list"
    );
}
