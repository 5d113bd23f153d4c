//! Business logic services for the local shop.
//!
//! # Services
//!
//! - `crypto` - Password hashing and lightweight identifiers
//! - `users` - User accounts and their addresses
//! - `auth` - Login, registration and the persisted session
//! - `addresses` - Address book of the logged-in user
//! - `categories` - Product categories with a reactive snapshot
//! - `products` - Product catalog

pub mod addresses;
pub mod auth;
pub mod categories;
pub mod crypto;
pub mod products;
pub mod users;

pub use addresses::{AddressError, AddressService};
pub use auth::{AuthError, AuthService};
pub use categories::{CategoryError, CategoryService};
pub use crypto::CryptoService;
pub use products::{ProductError, ProductService};
pub use users::{LocalUserService, UserError};
