//! User domain types.
//!
//! [`StoredUser`] is the persisted record and carries the password hash.
//! [`User`] is what every service hands back to callers: the same record
//! with the password stripped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use local_shop_core::{Email, UserId, UserRole};

/// A user as persisted under the `users` key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    /// Sequentially assigned user ID.
    pub user_id: UserId,
    /// Display name (trimmed).
    pub name: String,
    /// Normalized (trimmed, lowercased) email address.
    pub email: Email,
    /// SHA-256 hex digest of password + static salt.
    pub password: String,
    /// Permission level.
    pub role: UserRole,
    /// Opaque cart payloads owned by other parts of the app.
    #[serde(default)]
    pub carts: Vec<Value>,
    /// Opaque order payloads owned by other parts of the app.
    #[serde(default)]
    pub orders: Vec<Value>,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl StoredUser {
    /// Copy of this record without the password hash.
    #[must_use]
    pub fn to_public(&self) -> User {
        User {
            user_id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            carts: self.carts.clone(),
            orders: self.orders.clone(),
        }
    }
}

/// A user as returned to callers (no password field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Sequentially assigned user ID.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized email address.
    pub email: Email,
    /// Permission level.
    pub role: UserRole,
    #[serde(default)]
    pub carts: Vec<Value>,
    #[serde(default)]
    pub orders: Vec<Value>,
}

impl User {
    /// Whether this user may use the admin panel.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<StoredUser> for User {
    fn from(stored: StoredUser) -> Self {
        Self {
            user_id: stored.user_id,
            name: stored.name,
            email: stored.email,
            role: stored.role,
            carts: stored.carts,
            orders: stored.orders,
        }
    }
}

/// Registration input, exactly as submitted by a form.
///
/// Fields are raw strings; validation and normalization happen in the
/// user service.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `"admin"` or `"client"`; absent means client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl CreateUserRequest {
    /// Convenience constructor for a client registration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: None,
        }
    }

    /// Set the requested role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Partial profile update. `None` leaves a field untouched.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl std::fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .finish()
    }
}
