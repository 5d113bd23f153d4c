//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;
use crate::services::users::UserError;

/// Errors that can occur during session-bound operations.
///
/// Login and registration never surface these; they report `false` and
/// log the cause instead.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user is logged in.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The user service rejected the operation.
    #[error(transparent)]
    User(#[from] UserError),

    /// Session keys could not be read or written.
    #[error("session storage error: {0}")]
    Store(#[from] StoreError),

    /// A blocking store task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
