//! Catalog and cart records as returned by the upstream API.
//!
//! All of these are server-owned. The storefront receives read-only copies,
//! renders them and drops them; nothing here is persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A purchasable product from `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Bare JSON number in the store currency.
    pub price: Decimal,
    pub image_url: String,
}

impl Product {
    /// Price in the store currency, for display.
    #[must_use]
    pub fn display_price(&self) -> Price {
        Price::new(self.price)
    }
}

/// A product suggested for one user, from `GET /recommendations/{user_id}`.
///
/// Same shape as [`Product`]; the user scoping lives in the request path.
pub type Recommendation = Product;

/// A line in the server-side cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
}
