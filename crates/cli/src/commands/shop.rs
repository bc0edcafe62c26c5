//! Catalog, recommendation and cart commands.
//!
//! # Usage
//!
//! ```bash
//! recshop products
//! recshop recommendations --user 3 --method collaborative
//! recshop probe
//! recshop cart add 12
//! recshop cart list
//! ```

use recshop_core::{Product, ProductId, RecommendationMethod, UserId};
use recshop_storefront::api::{RecommendationQuery, SessionStatus};

use super::{CommandError, Connection};

fn log_products(products: &[Product]) {
    if products.is_empty() {
        tracing::info!("No products");
    }
    for product in products {
        tracing::info!(
            "{:>6}  {:<40} {}",
            product.id,
            product.name,
            product.display_price()
        );
    }
}

/// List the catalog.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn products(conn: &Connection) -> Result<(), CommandError> {
    let products = conn.client.list_products(&conn.session).await?;
    log_products(&products);
    Ok(())
}

/// List recommendations for a user.
///
/// # Errors
///
/// Returns an error if the API call fails, including `401`.
pub async fn recommendations(
    conn: &Connection,
    user_id: UserId,
    method: Option<RecommendationMethod>,
    product_id: Option<ProductId>,
) -> Result<(), CommandError> {
    let query = RecommendationQuery { method, product_id };
    let recommendations = conn
        .client
        .recommendations(&conn.session, user_id, &query)
        .await?;
    log_products(&recommendations);
    Ok(())
}

/// Report whether the API accepts the session.
///
/// # Errors
///
/// Returns an error if the API call fails for a reason other than `401`.
pub async fn probe(conn: &Connection, user_id: UserId) -> Result<(), CommandError> {
    match conn.client.probe_session(&conn.session, user_id).await? {
        SessionStatus::Active(_) => tracing::info!("active"),
        SessionStatus::Unauthorized => tracing::info!("unauthorized"),
    }
    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn cart_add(conn: &Connection, product_id: ProductId) -> Result<(), CommandError> {
    let outcome = conn.client.add_to_cart(&conn.session, product_id).await?;
    if outcome.added {
        tracing::info!("{}", outcome.message);
    } else {
        tracing::warn!("{}", outcome.message);
    }
    Ok(())
}

/// List the cart.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn cart_list(conn: &Connection) -> Result<(), CommandError> {
    let items = conn.client.cart(&conn.session).await?;
    if items.is_empty() {
        tracing::info!("Cart is empty");
    }
    for item in items {
        tracing::info!("Product ID: {}", item.product_id);
    }
    Ok(())
}
