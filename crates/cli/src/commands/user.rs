//! User management commands.

use local_shop_core::UserId;
use local_shop_storefront::ShopState;
use local_shop_storefront::models::{CreateUserRequest, UpdateUserRequest, User};

use super::CliError;

fn report(user: &User) {
    tracing::info!(
        user_id = %user.user_id,
        name = %user.name,
        email = %user.email,
        role = %user.role,
        "User"
    );
}

/// Register a new user.
pub fn create(
    state: &ShopState,
    name: String,
    email: String,
    password: String,
    role: Option<String>,
) -> Result<(), CliError> {
    let request = CreateUserRequest {
        name,
        email,
        password,
        role,
    };
    let user = state.users().create_user(&request)?;
    tracing::info!(user_id = %user.user_id, "User created");
    report(&user);
    Ok(())
}

/// Show one user.
pub fn show(state: &ShopState, id: UserId) -> Result<(), CliError> {
    let user = state
        .users()
        .find_user_by_id(id)?
        .ok_or_else(|| CliError::NotFound(format!("User with ID {id}")))?;
    report(&user);
    Ok(())
}

/// List every user.
pub fn list(state: &ShopState) -> Result<(), CliError> {
    let users = state.users().list_users()?;
    tracing::info!(count = users.len(), "Users");
    users.iter().for_each(report);
    Ok(())
}

/// Update fields of a user.
pub fn update(
    state: &ShopState,
    id: UserId,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
) -> Result<(), CliError> {
    let changes = UpdateUserRequest {
        name,
        email,
        password,
        role,
    };
    let user = state.users().update_user(id, &changes)?;
    report(&user);
    Ok(())
}

/// Remove a user.
pub fn remove(state: &ShopState, id: UserId) -> Result<(), CliError> {
    state.users().remove_user(id)?;
    tracing::info!(user_id = %id, "User removed");
    Ok(())
}

/// Log in and persist the session in the store.
pub async fn login(state: &ShopState, email: &str, password: &str) -> Result<(), CliError> {
    if !state.auth().login(email, password).await {
        return Err(CliError::LoginFailed(email.to_owned()));
    }
    if let Some(token) = state.auth().access_token() {
        tracing::info!(access_token = %token, admin = state.auth().is_admin(), "Logged in");
    }
    Ok(())
}
