//! Domain models for storefront.
//!
//! Catalog records come from `recshop_core`; this module only holds the
//! per-visitor session context.

pub mod session;

pub use session::{SessionContext, keys as session_keys};
