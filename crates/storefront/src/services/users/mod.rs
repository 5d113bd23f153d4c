//! Local user service.
//!
//! Owns the `users` and `addresses` tables: user CRUD, credential checks,
//! and address CRUD with the single-default-address rule.
//!
//! Every operation is a read-modify-write of a whole table. Two concurrent
//! registrations with the same email can both pass the duplicate check
//! before either writes; callers needing stronger guarantees must serialize
//! access themselves.

mod addresses;
mod error;
mod validation;

pub use error::UserError;
pub use validation::{MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH};

use std::sync::Arc;

use tracing::{debug, info, instrument};

use local_shop_core::UserId;

use crate::db::{ADDRESSES, KeyValueStore, Table, USERS};
use crate::models::{Address, CreateUserRequest, StoredUser, UpdateUserRequest, User};
use crate::services::crypto::CryptoService;

/// User and address persistence with validation.
pub struct LocalUserService {
    store: Arc<dyn KeyValueStore>,
    crypto: CryptoService,
}

impl LocalUserService {
    /// Create a new user service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, crypto: CryptoService) -> Self {
        Self { store, crypto }
    }

    /// The hasher used for stored passwords.
    #[must_use]
    pub const fn crypto(&self) -> &CryptoService {
        &self.crypto
    }

    fn users(&self) -> Table<'_, StoredUser> {
        Table::new(self.store.as_ref(), USERS)
    }

    fn addresses(&self) -> Table<'_, Address> {
        Table::new(self.store.as_ref(), ADDRESSES)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a new user.
    ///
    /// Trims the name, normalizes the email, hashes the password and assigns
    /// the next sequential ID.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Validation` if a field is invalid.
    /// Returns `UserError::DuplicateEmail` if the email is already registered.
    #[instrument(skip(self, request))]
    pub fn create_user(&self, request: &CreateUserRequest) -> Result<User, UserError> {
        let new_user = validation::validate_new_user(request)?;

        let users = self.users();
        let mut records = users.load()?;
        if records
            .iter()
            .any(|u| u.email.matches(new_user.email.as_str()))
        {
            debug!("Registration rejected: email already exists");
            return Err(UserError::DuplicateEmail);
        }

        let user = StoredUser {
            user_id: UserId::new(users.next_id()?),
            name: new_user.name,
            email: new_user.email,
            password: self.crypto.hash_password(&request.password),
            role: new_user.role,
            carts: Vec::new(),
            orders: Vec::new(),
        };
        let public = user.to_public();
        records.push(user);
        users.save(&records)?;

        info!(user_id = %public.user_id, role = %public.role, "User created");
        Ok(public)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Store` if the users table cannot be read.
    pub fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        Ok(self
            .users()
            .load()?
            .into_iter()
            .find(|u| u.user_id == id)
            .map(User::from))
    }

    /// Get a user by email, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Store` if the users table cannot be read.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users()
            .load()?
            .into_iter()
            .find(|u| u.email.matches(email))
            .map(User::from))
    }

    /// All users, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Store` if the users table cannot be read.
    pub fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users().load()?.into_iter().map(User::from).collect())
    }

    /// Apply a partial update to a user.
    ///
    /// Fields present in `changes` are validated with the registration rules;
    /// a new password is re-hashed.
    ///
    /// # Errors
    ///
    /// Returns `UserError::UserNotFound` if the user doesn't exist.
    /// Returns `UserError::Validation` if a supplied field is invalid.
    /// Returns `UserError::DuplicateEmail` if the new email belongs to another user.
    #[instrument(skip(self, changes))]
    pub fn update_user(&self, id: UserId, changes: &UpdateUserRequest) -> Result<User, UserError> {
        let users = self.users();
        let mut records = users.load()?;
        if !records.iter().any(|u| u.user_id == id) {
            return Err(UserError::UserNotFound(id));
        }

        let changes = validation::validate_user_update(changes)?;
        if let Some(email) = &changes.email
            && records
                .iter()
                .any(|u| u.user_id != id && u.email.matches(email.as_str()))
        {
            return Err(UserError::DuplicateEmail);
        }

        let record = records
            .iter_mut()
            .find(|u| u.user_id == id)
            .ok_or(UserError::UserNotFound(id))?;
        if let Some(name) = changes.name {
            record.name = name;
        }
        if let Some(email) = changes.email {
            record.email = email;
        }
        if let Some(password) = changes.password {
            record.password = self.crypto.hash_password(&password);
        }
        if let Some(role) = changes.role {
            record.role = role;
        }
        let public = record.to_public();
        users.save(&records)?;

        info!(user_id = %id, "User updated");
        Ok(public)
    }

    /// Delete a user. Their addresses are left in place.
    ///
    /// # Errors
    ///
    /// Returns `UserError::UserNotFound` if the user doesn't exist.
    #[instrument(skip(self))]
    pub fn remove_user(&self, id: UserId) -> Result<(), UserError> {
        let users = self.users();
        let mut records = users.load()?;
        let before = records.len();
        records.retain(|u| u.user_id != id);
        if records.len() == before {
            return Err(UserError::UserNotFound(id));
        }
        users.save(&records)?;

        info!(user_id = %id, "User removed");
        Ok(())
    }

    /// Check an email/password pair.
    ///
    /// Returns `None` for an unknown email or a wrong password; these are
    /// expected outcomes, not errors.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Store` if the users table cannot be read.
    pub fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, UserError> {
        let Some(user) = self
            .users()
            .load()?
            .into_iter()
            .find(|u| u.email.matches(email))
        else {
            debug!("Authentication failed: unknown email");
            return Ok(None);
        };

        if !self.crypto.compare_passwords(password, &user.password) {
            debug!(user_id = %user.user_id, "Authentication failed: wrong password");
            return Ok(None);
        }

        Ok(Some(user.into()))
    }
}
