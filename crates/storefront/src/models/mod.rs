//! Domain models for the storefront.
//!
//! Records are serialized with the camelCase field names the store has
//! always used (`userId`, `zipCode`, `isDefault`, ...), so existing data
//! loads unchanged.

pub mod address;
pub mod category;
pub mod product;
pub mod session;
pub mod user;

pub use address::{Address, CreateAddressRequest, UpdateAddressRequest};
pub use category::Category;
pub use product::{CreateProductRequest, Product, UpdateProductRequest};
pub use session::Session;
pub use user::{CreateUserRequest, StoredUser, UpdateUserRequest, User};
