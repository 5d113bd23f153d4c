//! Integration tests for Local Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p local-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `users` - Registration, lookup and profile scenarios
//! - `addresses` - Default-address invariant across operations
//! - `default_address` - Randomized sequences against the default-address rule
//! - `catalog` - Categories and products
//! - `session` - Login state and session restore
//! - `file_store` - Persistence through the JSON file backend
//!
//! Every test builds its own [`TestContext`], so tests never share state.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use local_shop_storefront::db::{KeyValueStore, MemoryStore};
use local_shop_storefront::models::{CreateAddressRequest, CreateUserRequest};
use local_shop_storefront::{ShopState, StoreConfig};

/// A service graph over a fresh store.
pub struct TestContext {
    pub state: ShopState,
    // Keeps the data directory alive for file-backed contexts.
    dir: Option<TempDir>,
}

impl TestContext {
    /// In-memory store, no demo categories.
    ///
    /// # Panics
    ///
    /// Panics if the services cannot be built.
    #[must_use]
    pub fn in_memory() -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        Self::over(store)
    }

    /// Services over an existing store, no demo categories.
    ///
    /// # Panics
    ///
    /// Panics if the services cannot be built.
    #[must_use]
    pub fn over(store: Arc<dyn KeyValueStore>) -> Self {
        let config = StoreConfig {
            seed_categories: false,
            ..StoreConfig::in_memory()
        };
        let state = ShopState::with_store(config, store).expect("Failed to build services");
        Self { state, dir: None }
    }

    /// File-backed store in a fresh temporary directory, demo categories seeded.
    ///
    /// # Panics
    ///
    /// Panics if the directory or the store cannot be created.
    #[must_use]
    pub fn file_backed() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let state = open_file_state(&dir.path().join("shop.json"));
        Self {
            state,
            dir: Some(dir),
        }
    }

    /// Path of the backing file, for file-backed contexts.
    #[must_use]
    pub fn data_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.path().join("shop.json"))
    }

    /// Build a second, independent service graph over the same file,
    /// as a new process would.
    ///
    /// # Panics
    ///
    /// Panics if this context is not file-backed.
    #[must_use]
    pub fn reopen(&self) -> ShopState {
        let path = self.data_path().expect("Context is not file-backed");
        open_file_state(&path)
    }
}

fn open_file_state(path: &Path) -> ShopState {
    let config = StoreConfig {
        data_path: Some(path.to_path_buf()),
        ..StoreConfig::in_memory()
    };
    ShopState::new(config).expect("Failed to open file-backed services")
}

/// A valid registration for `email`.
#[must_use]
pub fn user_request(name: &str, email: &str) -> CreateUserRequest {
    CreateUserRequest::new(name, email, "secret1")
}

/// A valid shipping address titled `title`.
#[must_use]
pub fn address_request(title: &str, is_default: Option<bool>) -> CreateAddressRequest {
    CreateAddressRequest {
        title: title.to_owned(),
        street: "500 Market Street".to_owned(),
        city: "San Francisco".to_owned(),
        state: "CA".to_owned(),
        zip_code: "94105".to_owned(),
        country: "US".to_owned(),
        address_type: "shipping".to_owned(),
        is_default,
    }
}
