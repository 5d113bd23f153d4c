//! Persistence through the JSON file backend.

use local_shop_integration_tests::{TestContext, address_request, user_request};
use local_shop_storefront::db::KeyValueStore;
use local_shop_storefront::services::UserError;

#[test]
fn data_survives_reopening() {
    let ctx = TestContext::file_backed();
    let jane = ctx
        .state
        .users()
        .create_user(&user_request("Jane Doe", "jane@test.com"))
        .expect("create user");
    ctx.state
        .users()
        .create_address(jane.user_id, &address_request("Home", None))
        .expect("create address");
    ctx.state.categories().create_category("Toys").expect("create category");

    let reopened = ctx.reopen();
    let found = reopened
        .users()
        .find_user_by_email("JANE@test.com")
        .expect("lookup")
        .expect("user persisted");
    assert_eq!(found, jane);
    assert_eq!(reopened.users().get_user_addresses(jane.user_id).expect("list").len(), 1);
    // Five demo categories plus the new one; reopening does not seed again.
    assert_eq!(reopened.categories().current().len(), 6);
}

#[tokio::test]
async fn session_survives_reopening() {
    let ctx = TestContext::file_backed();
    assert!(ctx.state.auth().register(&user_request("Jane Doe", "jane@test.com")).await);

    let reopened = ctx.reopen();
    assert!(reopened.auth().is_logged_in());
    assert_eq!(
        reopened.auth().current_user().map(|u| u.name),
        Some("Jane Doe".to_owned())
    );
}

#[test]
fn corrupted_table_is_reported() {
    let ctx = TestContext::file_backed();
    let path = ctx.data_path().expect("file-backed");
    ctx.state.store().set("users", "{broken").expect("write raw value");
    assert!(path.exists());

    let err = ctx
        .state
        .users()
        .list_users()
        .expect_err("corrupted table must not load");
    assert!(matches!(err, UserError::Store(_)));
}
