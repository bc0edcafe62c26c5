//! Request and response types for the upstream API.
//!
//! Catalog records (`Product`, `CartItem`) live in `recshop_core`; these are
//! the request shapes and the outcomes specific to individual endpoints.

use secrecy::SecretString;
use serde::Deserialize;

use recshop_core::{ProductId, RecommendationMethod, UserId};

pub use recshop_core::{CartItem, Product, Recommendation};

/// Optional parameters for `GET /recommendations/{user_id}`.
///
/// Both absent means no query string is sent and the server picks its default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecommendationQuery {
    pub method: Option<RecommendationMethod>,
    /// Seed product for content-based scoring.
    pub product_id: Option<ProductId>,
}

impl RecommendationQuery {
    /// Whether any parameter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.method.is_none() && self.product_id.is_none()
    }

    /// Query string pairs in a stable order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(method) = self.method {
            pairs.push(("method", method.as_str().to_string()));
        }
        if let Some(product_id) = self.product_id {
            pairs.push(("product_id", product_id.to_string()));
        }
        pairs
    }
}

/// Result of the session probe.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    /// The API accepted the session; carries the (unused) response body.
    Active(serde_json::Value),
    /// The API answered `401`. The body was not read.
    Unauthorized,
}

/// A `{message}` body, as returned by `POST /cart` and `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Result of `POST /cart`.
///
/// The API answers with a `{message}` body whether or not the product was
/// added; `added` records whether the status was a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartOutcome {
    pub message: String,
    pub added: bool,
}

/// Login credentials for `POST /login`.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account details for `POST /register`.
#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful `POST /login`.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Server message, or a generic confirmation when the body had none.
    pub message: String,
    /// Cookie pairs from `Set-Cookie`, ready to replay as a `Cookie` header.
    pub api_cookie: Option<SecretString>,
    /// User id, when the server reports one.
    pub user_id: Option<UserId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_pairs() {
        let query = RecommendationQuery::default();
        assert!(query.is_empty());
        assert!(query.pairs().is_empty());
    }

    #[test]
    fn test_query_pairs() {
        let query = RecommendationQuery {
            method: Some(RecommendationMethod::Collaborative),
            product_id: Some(ProductId::new(101)),
        };
        assert!(!query.is_empty());
        assert_eq!(
            query.pairs(),
            vec![
                ("method", "collaborative".to_string()),
                ("product_id", "101".to_string()),
            ]
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            email: "ada@example.com".to_string(),
            password: SecretString::from("hunter2hunter2"),
        };
        let debug_output = format!("{creds:?}");
        assert!(debug_output.contains("ada@example.com"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_cart_message_parse() {
        let msg: ApiMessage =
            serde_json::from_str(r#"{"message": "Product added to cart"}"#).unwrap();
        assert_eq!(msg.message, "Product added to cart");
    }
}
