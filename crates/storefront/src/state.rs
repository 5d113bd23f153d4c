//! Shared service graph.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::db::{self, KeyValueStore, StoreError};
use crate::services::addresses::AddressService;
use crate::services::auth::AuthService;
use crate::services::categories::{CategoryError, CategoryService};
use crate::services::crypto::CryptoService;
use crate::services::products::ProductService;
use crate::services::users::LocalUserService;

/// Error wiring up the services.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
    #[error("failed to load categories: {0}")]
    Categories(#[from] CategoryError),
}

/// Every service, built once over one store.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ShopState {
    inner: Arc<ShopStateInner>,
}

struct ShopStateInner {
    config: StoreConfig,
    store: Arc<dyn KeyValueStore>,
    users: Arc<LocalUserService>,
    auth: Arc<AuthService>,
    addresses: AddressService,
    categories: CategoryService,
    products: ProductService,
}

impl ShopState {
    /// Open the configured store and build the services on top of it.
    ///
    /// # Errors
    ///
    /// Returns `StateError::Store` if the store cannot be opened.
    /// Returns `StateError::Categories` if the category table cannot be loaded or seeded.
    pub fn new(config: StoreConfig) -> Result<Self, StateError> {
        let store = db::open_store(&config)?;
        Self::with_store(config, store)
    }

    /// Build the services over an already opened store.
    ///
    /// # Errors
    ///
    /// Returns `StateError::Categories` if the category table cannot be loaded or seeded.
    pub fn with_store(
        config: StoreConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, StateError> {
        let crypto = CryptoService::from_config(&config);
        let users = Arc::new(LocalUserService::new(Arc::clone(&store), crypto));
        let auth = Arc::new(AuthService::new(Arc::clone(&store), Arc::clone(&users)));
        let addresses = AddressService::new(Arc::clone(&auth), Arc::clone(&users));
        let categories = CategoryService::new(Arc::clone(&store), config.seed_categories)?;
        let products = ProductService::new(Arc::clone(&store));

        Ok(Self {
            inner: Arc::new(ShopStateInner {
                config,
                store,
                users,
                auth,
                addresses,
                categories,
                products,
            }),
        })
    }

    /// The configuration the services were built from.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// The underlying key-value store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.store
    }

    /// User and address records.
    #[must_use]
    pub fn users(&self) -> &LocalUserService {
        &self.inner.users
    }

    /// Login state and the current session.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Address book of the logged-in user.
    #[must_use]
    pub fn addresses(&self) -> &AddressService {
        &self.inner.addresses
    }

    /// Category catalog.
    #[must_use]
    pub fn categories(&self) -> &CategoryService {
        &self.inner.categories
    }

    /// Product catalog.
    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }
}
