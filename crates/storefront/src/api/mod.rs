//! Client for the upstream Recshop REST API.
//!
//! # Architecture
//!
//! - The upstream server is the source of truth for products, carts and
//!   sessions; nothing is cached or persisted here
//! - One method per endpoint, each issuing exactly one request
//! - The caller's [`SessionContext`](crate::models::SessionContext) is passed
//!   explicitly and its upstream cookie replayed on every call
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/products               - catalog
//! GET  /recommendations/{user_id}  - recommendations (also the session probe)
//! POST /cart                       - add to cart, returns {message}
//! GET  /cart                       - cart contents
//! POST /login                      - log in, sets the upstream session cookie
//! POST /register                   - create an account
//! POST /logout                     - end the upstream session
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use recshop_storefront::api::{ApiClient, RecommendationQuery};
//!
//! let client = ApiClient::new(&config.api)?;
//! let ctx = SessionContext::anonymous(UserId::new(1));
//!
//! let products = client.list_products(&ctx).await?;
//! let recs = client
//!     .recommendations(&ctx, ctx.user_id(), &RecommendationQuery::default())
//!     .await?;
//! ```

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the upstream API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed at the transport layer.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the session (`401`).
    #[error("Unauthorized")]
    Unauthorized,

    /// The API returned a non-success status other than `401`.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
