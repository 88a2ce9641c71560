//! Carter Chaos Storefront library.
//!
//! Sanity content queries, cart and auth state containers, and the JSON HTTP
//! API that exposes them. The binary in `main.rs` only wires these together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sanity;
pub mod state;
