//! User registration and lookup scenarios.

use local_shop_core::UserId;
use local_shop_integration_tests::{TestContext, user_request};
use local_shop_storefront::models::UpdateUserRequest;
use local_shop_storefront::services::UserError;

#[test]
fn registration_normalizes_and_hides_password() {
    let ctx = TestContext::in_memory();
    let user = ctx
        .state
        .users()
        .create_user(&user_request("Jane Doe", "Jane@Test.com"))
        .expect("registration should succeed");

    assert_eq!(user.email.as_str(), "jane@test.com");
    assert_eq!(user.user_id, UserId::new(1));

    let json = serde_json::to_value(&user).expect("user serializes");
    assert!(json.get("password").is_none());
    assert!(json["userId"].is_number());
}

#[test]
fn case_variant_email_is_a_duplicate() {
    let ctx = TestContext::in_memory();
    let users = ctx.state.users();
    users
        .create_user(&user_request("Jane Doe", "Jane@Test.com"))
        .expect("first registration");

    let err = users
        .create_user(&user_request("Other Jane", "JANE@TEST.COM"))
        .expect_err("second registration must fail");
    assert!(matches!(err, UserError::DuplicateEmail));
    assert_eq!(err.to_string(), "Email already exists");
}

#[test]
fn ids_continue_from_existing_counter() {
    let store = std::sync::Arc::new(local_shop_storefront::db::MemoryStore::with_entries([
        ("users", "[]"),
        ("user_id_counter", "41"),
    ]));
    let ctx = TestContext::over(store);
    let users = ctx.state.users();

    let first = users.create_user(&user_request("Ann Lee", "ann@test.com")).expect("create");
    let second = users.create_user(&user_request("Bob Ray", "bob@test.com")).expect("create");
    assert_eq!(first.user_id, UserId::new(42));
    assert_eq!(second.user_id, UserId::new(43));
}

#[test]
fn update_then_authenticate_with_new_credentials() {
    let ctx = TestContext::in_memory();
    let users = ctx.state.users();
    let jane = users
        .create_user(&user_request("Jane Doe", "jane@test.com"))
        .expect("create");

    let changes = UpdateUserRequest {
        email: Some("jane.doe@test.com".into()),
        password: Some("better-secret".into()),
        ..UpdateUserRequest::default()
    };
    users.update_user(jane.user_id, &changes).expect("update");

    assert!(users
        .authenticate_user("jane@test.com", "secret1")
        .expect("lookup")
        .is_none());
    let found = users
        .authenticate_user("Jane.Doe@test.com", "better-secret")
        .expect("lookup")
        .expect("new credentials work");
    assert_eq!(found.user_id, jane.user_id);
}

#[test]
fn missing_user_errors_carry_the_id() {
    let ctx = TestContext::in_memory();
    let err = ctx
        .state
        .users()
        .remove_user(UserId::new(77))
        .expect_err("nothing to remove");
    assert_eq!(err.to_string(), "User with ID 77 not found");
}
