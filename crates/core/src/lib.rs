//! Recshop Core - Shared domain types.
//!
//! This crate provides the types shared by the Recshop components:
//! - `storefront` - Server that renders catalog, recommendation and cart fragments
//! - `cli` - Command-line client for the same upstream API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O and no HTTP clients. The
//! upstream API owns every entity; these are read-only copies of its JSON.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, catalog records and recommendation methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
