//! Product catalog fragment.
//!
//! Requested by the page shell on load and swapped into `#product-catalog`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use recshop_core::Product;

use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Card class for catalog products.
pub const CATALOG_CARD_CLASS: &str = "product-card";

/// Product card display data for templates.
#[derive(Clone, Debug)]
pub struct ProductCardView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.display_price().to_string(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Product cards fragment, shared by the catalog and the recommendations panel.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_cards.html")]
pub struct ProductCardsTemplate {
    pub card_class: &'static str,
    pub products: Vec<ProductCardView>,
}

impl ProductCardsTemplate {
    /// Build a fragment with one card per product.
    #[must_use]
    pub fn new(card_class: &'static str, products: &[Product]) -> Self {
        Self {
            card_class,
            products: products.iter().map(ProductCardView::from).collect(),
        }
    }
}

/// Render the product catalog.
///
/// A failed request leaves the container empty; the failure is only logged.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> impl IntoResponse {
    let products = match state.api().list_products(&session).await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!("Failed to fetch products: {e}");
            Vec::new()
        }
    };

    ProductCardsTemplate::new(CATALOG_CARD_CLASS, &products)
}
