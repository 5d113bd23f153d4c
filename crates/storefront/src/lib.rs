//! Local Shop storefront library.
//!
//! Users, addresses, categories, products and the login session, persisted
//! as JSON values in a flat key-value store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod state;

pub use config::{ConfigError, StoreConfig};
pub use state::{ShopState, StateError};
