//! Core types for Recshop.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod catalog;
pub mod id;
pub mod price;
pub mod recommendation;

pub use catalog::{CartItem, Product, Recommendation};
pub use id::*;
pub use price::{CURRENCY_SYMBOL, Price};
pub use recommendation::{RecommendationMethod, RecommendationMethodError};
