//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Page shell (containers load fragments)
//! GET  /health                      - Health check
//!
//! # Fragments (HTMX)
//! GET  /fragments/catalog           - Product cards for #product-catalog
//! GET  /fragments/recommendations   - Recommendation cards for #recommendations
//! GET  /fragments/session-probe     - Session check, redirects to login on 401
//!
//! # Cart (HTMX fragments)
//! POST /cart                        - Add to cart (message, triggers cart-updated)
//! GET  /cart/items                  - Cart contents for #cart-items
//!
//! # Auth
//! GET  /login                       - Login page
//! POST /login                       - Login action
//! GET  /register                    - Register page
//! POST /register                    - Register action
//! POST /logout                      - Logout action (reloads the page)
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod home;
pub mod recommendations;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the fragment routes router.
pub fn fragment_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog::show))
        .route("/recommendations", get(recommendations::show))
        .route("/session-probe", get(recommendations::probe))
}

/// Create all routes (without layers or state).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/fragments", fragment_routes())
        .route("/cart", post(cart::add))
        .route("/cart/items", get(cart::items))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Build the full application: routes, static files, and middleware.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let static_files = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", static_files)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the upstream API.
async fn health() -> &'static str {
    "ok"
}
