//! Command implementations.
//!
//! Results are reported through `tracing`, the same channel as errors, so
//! `SHOP_LOG_FORMAT=json` turns the whole output into JSON lines.

pub mod address;
pub mod category;
pub mod product;
pub mod user;

use thiserror::Error;

use local_shop_storefront::services::{CategoryError, CryptoService, ProductError, UserError};
use local_shop_storefront::{ConfigError, StateError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    State(#[from] StateError),

    #[error("{0}")]
    User(#[from] UserError),

    #[error("{0}")]
    Category(#[from] CategoryError),

    #[error("{0}")]
    Product(#[from] ProductError),

    /// Login was refused (details are in the preceding log lines).
    #[error("login failed for {0}")]
    LoginFailed(String),

    #[error("{0} not found")]
    NotFound(String),
}

/// Print the simple hash of `text`.
pub fn hash(text: &str) {
    tracing::info!(hash = %CryptoService::generate_simple_hash(text), "Simple hash");
}
