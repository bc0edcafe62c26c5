//! Cart route handlers.
//!
//! Adding an item shows the server's message in `#cart-message` and fires
//! `cart-updated`, which refreshes `#cart-items`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use recshop_core::{CartItem, ProductId};

use crate::error::add_breadcrumb;
use crate::middleware::{CurrentSession, htmx::HX_TRIGGER};
use crate::state::AppState;

/// Event fired after a successful add, picked up by `#cart-items`.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
}

/// Cart item display data for templates.
#[derive(Clone, Debug)]
pub struct CartItemView {
    pub product_id: i64,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.as_i64(),
        }
    }
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub items: Vec<CartItemView>,
}

impl CartItemsTemplate {
    #[must_use]
    pub fn new(items: &[CartItem]) -> Self {
        Self {
            items: items.iter().map(CartItemView::from).collect(),
        }
    }
}

/// Add-to-cart confirmation fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_message.html")]
pub struct CartMessageTemplate {
    pub message: String,
}

/// Add a product to the cart (HTMX).
///
/// Shows the server's message whatever the status; only a successful add
/// fires `cart-updated`. A transport or parse failure is logged and leaves
/// `#cart-message` untouched.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);
    let product_id_str = product_id.to_string();
    add_breadcrumb(
        "cart",
        "Add to cart",
        Some(&[("product_id", product_id_str.as_str())]),
    );

    match state.api().add_to_cart(&session, product_id).await {
        Ok(outcome) if outcome.added => (
            AppendHeaders([(HX_TRIGGER, CART_UPDATED_EVENT)]),
            CartMessageTemplate {
                message: outcome.message,
            },
        )
            .into_response(),
        Ok(outcome) => CartMessageTemplate {
            message: outcome.message,
        }
        .into_response(),
        Err(e) => {
            tracing::warn!("Failed to add product {product_id} to cart: {e}");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

/// Render the cart contents (HTMX).
///
/// Each call replaces the container, so only the latest listing is shown.
/// A failed request renders an empty list.
#[instrument(skip(state, session))]
pub async fn items(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> impl IntoResponse {
    let items = match state.api().cart(&session).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Failed to fetch cart: {e}");
            Vec::new()
        }
    };

    CartItemsTemplate::new(&items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_items_render_product_ids() {
        let items: Vec<CartItem> =
            serde_json::from_str(r#"[{"productId": 3}, {"productId": 17}]"#).unwrap();
        let html = CartItemsTemplate::new(&items).render().unwrap();

        assert_eq!(html.matches("class=\"cart-item\"").count(), 2);
        assert!(html.contains("Product ID: 3"));
        assert!(html.contains("Product ID: 17"));
    }

    #[test]
    fn test_empty_cart_renders_nothing() {
        let html = CartItemsTemplate::new(&[]).render().unwrap();
        assert!(html.trim().is_empty());
    }

    #[test]
    fn test_cart_message_is_escaped() {
        let html = CartMessageTemplate {
            message: "Added <script>".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Added &lt;script&gt;"));
    }
}
