//! Upstream API client implementation.

use std::sync::Arc;

use reqwest::header::{COOKIE, HeaderMap, SET_COOKIE};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use recshop_core::{ProductId, UserId};

use super::ApiError;
use super::types::{
    ApiMessage, CartItem, CartOutcome, Credentials, LoginOutcome, Product, Recommendation,
    RecommendationQuery, Registration, SessionStatus,
};
use crate::config::ApiConfig;
use crate::models::SessionContext;

/// Longest slice of an error body kept in logs and error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Message shown when a login succeeds without a readable body.
const DEFAULT_LOGIN_MESSAGE: &str = "Logged in successfully!";

/// Client for the upstream catalog, cart and session API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("recshop-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL every endpoint is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Start a request carrying the session's upstream cookie.
    fn request(&self, method: Method, url: Url, session: &SessionContext) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match session.api_cookie() {
            Some(cookie) => builder.header(COOKIE, cookie.expose_secret()),
            None => builder,
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns a non-success
    /// status, or the body is not a product array.
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn list_products(&self, session: &SessionContext) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint("api/products")?;
        let response = self.request(Method::GET, url, session).send().await?;
        let products: Vec<Product> = read_json(check_status(response).await?).await?;

        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Fetch recommendations for a user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on `401`, and other errors if the
    /// request fails or the body is not a product array.
    #[instrument(skip(self, session), fields(user_id = %user_id))]
    pub async fn recommendations(
        &self,
        session: &SessionContext,
        user_id: UserId,
        query: &RecommendationQuery,
    ) -> Result<Vec<Recommendation>, ApiError> {
        let url = self.recommendations_url(user_id, query)?;
        let response = self.request(Method::GET, url, session).send().await?;
        let recommendations: Vec<Recommendation> =
            read_json(check_status(response).await?).await?;

        debug!(count = recommendations.len(), "Fetched recommendations");
        Ok(recommendations)
    }

    /// Probe whether the upstream session is still valid.
    ///
    /// Requests recommendations for `user_id` purely for the status code. On
    /// `401` the body is never read.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns a non-success
    /// status other than `401`, or the body is not JSON.
    #[instrument(skip(self, session), fields(user_id = %user_id))]
    pub async fn probe_session(
        &self,
        session: &SessionContext,
        user_id: UserId,
    ) -> Result<SessionStatus, ApiError> {
        let url = self.recommendations_url(user_id, &RecommendationQuery::default())?;
        let response = self.request(Method::GET, url, session).send().await?;

        match check_status(response).await {
            Ok(response) => Ok(SessionStatus::Active(read_json(response).await?)),
            Err(ApiError::Unauthorized) => Ok(SessionStatus::Unauthorized),
            Err(e) => Err(e),
        }
    }

    fn recommendations_url(
        &self,
        user_id: UserId,
        query: &RecommendationQuery,
    ) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&format!("recommendations/{user_id}"))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        Ok(url)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a product to the server-side cart.
    ///
    /// Sends exactly one `POST /cart` with body `{"productId": <id>}`. The
    /// `{message}` body is read for any status, so a rejection still carries
    /// the server's explanation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body has no `message`.
    #[instrument(skip(self, session), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        session: &SessionContext,
        product_id: ProductId,
    ) -> Result<CartOutcome, ApiError> {
        let url = self.endpoint("cart")?;
        let body = serde_json::json!({ "productId": product_id });

        let response = self
            .request(Method::POST, url, session)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let added = status.is_success();
        if !added {
            tracing::warn!(status = %status, "API did not add product to cart");
        }

        let reply: ApiMessage = read_json(response).await?;
        Ok(CartOutcome {
            message: reply.message,
            added,
        })
    }

    /// Fetch the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns a non-success
    /// status, or the body is not a cart item array.
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn cart(&self, session: &SessionContext) -> Result<Vec<CartItem>, ApiError> {
        let url = self.endpoint("cart")?;
        let response = self.request(Method::GET, url, session).send().await?;
        read_json(check_status(response).await?).await
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Log in and capture the upstream session cookie.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for rejected credentials, and other
    /// errors if the request fails or the API returns a non-success status.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, ApiError> {
        let url = self.endpoint("login")?;
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });

        let response = self.inner.client.post(url).json(&body).send().await?;
        let response = check_status(response).await?;
        let api_cookie = capture_cookies(response.headers()).map(SecretString::from);

        // The body is informational only; a malformed one still means success.
        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();

        let message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(DEFAULT_LOGIN_MESSAGE)
            .to_string();
        let user_id = body
            .get("user_id")
            .and_then(serde_json::Value::as_i64)
            .map(UserId::new);

        debug!(
            has_cookie = api_cookie.is_some(),
            user_id = ?user_id,
            "Login accepted"
        );

        Ok(LoginOutcome {
            message,
            api_cookie,
            user_id,
        })
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns a non-success
    /// status, or the body has no `message`.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint("register")?;
        let body = serde_json::json!({
            "username": registration.username,
            "email": registration.email,
            "password": registration.password.expose_secret(),
        });

        let response = self.inner.client.post(url).json(&body).send().await?;
        read_json(check_status(response).await?).await
    }

    /// End the upstream session. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API returns a
    /// non-success status.
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn logout(&self, session: &SessionContext) -> Result<(), ApiError> {
        let url = self.endpoint("logout")?;
        let response = self.request(Method::POST, url, session).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Map `401` and other non-success statuses to errors.
///
/// A `401` response is returned before its body is read.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        tracing::warn!(status = %status, body = %message, "API returned non-success status");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

/// Read a response body as JSON, logging the body on parse failure.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(ERROR_BODY_LIMIT).collect::<String>(),
            "Failed to parse API response"
        );
        ApiError::Parse(e)
    })
}

/// Collect `name=value` pairs from every `Set-Cookie` header.
///
/// Attributes (`Path`, `HttpOnly`, ...) are dropped; the result is a value
/// suitable for a `Cookie` request header.
fn capture_cookies(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;
    use recshop_core::RecommendationMethod;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_capture_cookies_strips_attributes() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("session=abc123; Path=/; HttpOnly"),
        );
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("remember_token=1|xyz; Expires=Wed, 21 Oct 2026 07:28:00 GMT"),
        );

        assert_eq!(
            capture_cookies(&headers).as_deref(),
            Some("session=abc123; remember_token=1|xyz")
        );
    }

    #[test]
    fn test_capture_cookies_none() {
        assert!(capture_cookies(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("garbage"));
        assert!(capture_cookies(&headers).is_none());
    }

    #[test]
    fn test_recommendations_url_without_query() {
        let api = client("http://api.local:5000");
        let url = api
            .recommendations_url(UserId::new(3), &RecommendationQuery::default())
            .unwrap();
        assert_eq!(url.as_str(), "http://api.local:5000/recommendations/3");
    }

    #[test]
    fn test_recommendations_url_with_query() {
        let api = client("http://api.local:5000/v1");
        let query = RecommendationQuery {
            method: Some(RecommendationMethod::Hybrid),
            product_id: Some(ProductId::new(101)),
        };
        let url = api.recommendations_url(UserId::new(1), &query).unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.local:5000/v1/recommendations/1?method=hybrid&product_id=101"
        );
    }

    #[test]
    fn test_endpoint_joins_onto_base_path() {
        let api = client("https://shop.example/backend/");
        assert_eq!(
            api.endpoint("api/products").unwrap().as_str(),
            "https://shop.example/backend/api/products"
        );
    }
}
