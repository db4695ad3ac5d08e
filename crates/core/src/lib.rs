//! Cafego Core - Shared types library.
//!
//! This crate provides common types used across all Cafego components:
//! - `storefront` - The shop web server
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. The optional `sqlite` feature adds sqlx encode/decode
//! implementations for the ID newtypes.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
