//! Carter Chaos Core - Shared types library.
//!
//! This crate provides common types used by the storefront:
//! - Sanity document IDs and session-scoped IDs
//! - Validated email addresses
//! - Decimal prices with currency formatting
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no runtime.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
