//! Session-related types.
//!
//! A session is the pair of values persisted under `access_token` and
//! `currentUser`.

use chrono::{DateTime, Utc};

use super::User;

/// Prefix of locally minted access tokens.
pub const TOKEN_PREFIX: &str = "local_token_";

/// A logged-in user together with the token minted at login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// `local_token_<epoch-ms>`.
    pub access_token: String,
    /// Snapshot of the logged-in user.
    pub user: User,
}

impl Session {
    /// Start a session for `user` at `now`.
    #[must_use]
    pub fn start(user: User, now: DateTime<Utc>) -> Self {
        Self {
            access_token: mint_token(now),
            user,
        }
    }
}

/// Mint a `local_token_<epoch-ms>` token.
#[must_use]
pub fn mint_token(now: DateTime<Utc>) -> String {
    format!("{TOKEN_PREFIX}{}", now.timestamp_millis())
}
