//! Address book of the logged-in user.
//!
//! Thin async wrapper over the address operations of [`LocalUserService`]
//! that fills in the owner from [`AuthService`].

use std::sync::Arc;

use thiserror::Error;

use local_shop_core::{AddressId, UserId};

use crate::models::{Address, CreateAddressRequest, UpdateAddressRequest};
use crate::services::auth::AuthService;
use crate::services::users::{LocalUserService, UserError};

/// Errors returned by [`AddressService`].
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("No authenticated user")]
    NoAuthenticatedUser,

    #[error(transparent)]
    User(#[from] UserError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Address operations scoped to the current session.
pub struct AddressService {
    auth: Arc<AuthService>,
    users: Arc<LocalUserService>,
}

impl AddressService {
    /// Create the service over the session in `auth`.
    #[must_use]
    pub const fn new(auth: Arc<AuthService>, users: Arc<LocalUserService>) -> Self {
        Self { auth, users }
    }

    fn current_user_id(&self) -> Result<UserId, AddressError> {
        self.auth
            .current_user()
            .map(|u| u.user_id)
            .ok_or(AddressError::NoAuthenticatedUser)
    }

    async fn run<T, F>(&self, f: F) -> Result<T, AddressError>
    where
        F: FnOnce(&LocalUserService, UserId) -> Result<T, UserError> + Send + 'static,
        T: Send + 'static,
    {
        let user_id = self.current_user_id()?;
        let users = Arc::clone(&self.users);
        Ok(tokio::task::spawn_blocking(move || f(users.as_ref(), user_id)).await??)
    }

    /// All addresses of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::NoAuthenticatedUser` if nobody is logged in.
    pub async fn get_addresses(&self) -> Result<Vec<Address>, AddressError> {
        self.run(|users, user_id| users.get_user_addresses(user_id)).await
    }

    /// One address of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::NoAuthenticatedUser` if nobody is logged in.
    pub async fn get_address(
        &self,
        address_id: AddressId,
    ) -> Result<Option<Address>, AddressError> {
        self.run(move |users, user_id| users.get_address(address_id, user_id))
            .await
    }

    /// # Errors
    ///
    /// Returns `AddressError::NoAuthenticatedUser` if nobody is logged in, or
    /// the user service's validation error.
    pub async fn create_address(
        &self,
        request: &CreateAddressRequest,
    ) -> Result<Address, AddressError> {
        let request = request.clone();
        self.run(move |users, user_id| users.create_address(user_id, &request))
            .await
    }

    /// # Errors
    ///
    /// Returns `AddressError::NoAuthenticatedUser` if nobody is logged in, or
    /// `UserError::AddressNotFound` for an address the user does not own.
    pub async fn update_address(
        &self,
        address_id: AddressId,
        changes: &UpdateAddressRequest,
    ) -> Result<Address, AddressError> {
        let changes = changes.clone();
        self.run(move |users, user_id| users.update_address(address_id, user_id, &changes))
            .await
    }

    /// # Errors
    ///
    /// Returns `AddressError::NoAuthenticatedUser` if nobody is logged in, or
    /// `UserError::AddressNotFound` for an address the user does not own.
    pub async fn set_default_address(
        &self,
        address_id: AddressId,
    ) -> Result<Address, AddressError> {
        self.run(move |users, user_id| users.set_default_address(address_id, user_id))
            .await
    }

    /// # Errors
    ///
    /// Returns `AddressError::NoAuthenticatedUser` if nobody is logged in, or
    /// `UserError::AddressNotFound` for an address the user does not own.
    pub async fn delete_address(&self, address_id: AddressId) -> Result<(), AddressError> {
        self.run(move |users, user_id| users.remove_address(address_id, user_id))
            .await
    }
}
