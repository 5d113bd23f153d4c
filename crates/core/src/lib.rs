//! Local Shop Core - Shared types library.
//!
//! This crate provides common types used across all Local Shop components:
//! - `storefront` - Persistence, validation and session services
//! - `cli` - Command-line tools operating on a file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
