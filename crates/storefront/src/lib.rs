//! Recshop storefront library.
//!
//! A server-rendered front end for the Recshop API: the page shell loads
//! product, recommendation and cart fragments over HTMX, and every fragment
//! is rendered from a call to the upstream REST API.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
