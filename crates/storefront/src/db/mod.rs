//! Key-value persistence for the storefront.
//!
//! # Layout
//!
//! Every entity type lives as a JSON array under a fixed key, next to a
//! decimal-string counter used for sequential ID assignment:
//!
//! - `users` / `user_id_counter`
//! - `addresses` / `address_id_counter`
//! - `categories` / `category_counter`
//! - `products` / `product_counter`
//!
//! Session state uses two more keys: `access_token` and `currentUser`.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, used by tests and ephemeral runs
//! - [`FileStore`] - a single JSON document on disk
//!
//! Access is read-modify-write with no transactions: the last writer wins.

mod file;
mod kv;
mod table;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use table::{Table, TableKeys};

use crate::config::StoreConfig;

/// Users table and its ID counter.
pub const USERS: TableKeys = TableKeys::new("users", "user_id_counter");
/// Addresses table and its ID counter.
pub const ADDRESSES: TableKeys = TableKeys::new("addresses", "address_id_counter");
/// Categories table and its ID counter.
pub const CATEGORIES: TableKeys = TableKeys::new("categories", "category_counter");
/// Products table and its ID counter.
pub const PRODUCTS: TableKeys = TableKeys::new("products", "product_counter");

/// Session token key (`local_token_<epoch-ms>`).
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Serialized logged-in user.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error from the file backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored JSON could not be decoded.
    #[error("data corruption under {key}: {source}")]
    Corrupted {
        /// Key (or file) holding the bad data.
        key: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// A value could not be encoded to JSON.
    #[error("failed to encode {key}: {source}")]
    Encode {
        /// Key being written.
        key: String,
        /// Underlying encode error.
        source: serde_json::Error,
    },

    /// An ID counter holds something other than a non-negative integer.
    #[error("invalid counter under {key}: {value:?}")]
    InvalidCounter {
        /// Counter key.
        key: String,
        /// Raw stored value.
        value: String,
    },

    /// Backend-specific failure (e.g. a poisoned lock).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Open the store described by `config`.
///
/// A configured data path selects the [`FileStore`]; otherwise an empty
/// [`MemoryStore`] is returned.
///
/// # Errors
///
/// Returns `StoreError::Io` if the data directory cannot be created.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match &config.data_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Opening file store");
            Ok(Arc::new(FileStore::open(path)?))
        }
        None => {
            tracing::info!("No data path configured, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
