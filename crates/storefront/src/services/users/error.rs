//! User and address error types.

use thiserror::Error;

use local_shop_core::{AddressId, UserId};

use crate::db::StoreError;

/// Errors returned by [`LocalUserService`](super::LocalUserService).
#[derive(Debug, Error)]
pub enum UserError {
    /// Input rejected before any store mutation.
    #[error("{field}: {reason}")]
    Validation {
        /// Wire name of the offending field (e.g. `"zipCode"`).
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// Another user already owns this email (compared case-insensitively).
    #[error("Email already exists")]
    DuplicateEmail,

    /// No user with this ID.
    #[error("User with ID {0} not found")]
    UserNotFound(UserId),

    /// No address with this ID owned by the given user.
    #[error("Address with ID {0} not found")]
    AddressNotFound(AddressId),

    /// Underlying store failure (including corrupted data).
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl UserError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Whether this is a form-level validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Whether this is an ID lookup failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::AddressNotFound(_))
    }
}
