//! Recommendations panel and session probe against the fake API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode, header};
use recshop_integration_tests::{Canned, Harness, body_text};
use serde_json::json;

fn two_products() -> serde_json::Value {
    json!([
        {"id": 4, "name": "Headlamp", "price": 35, "image_url": "/4.png"},
        {"id": 9, "name": "Tent", "price": 249.99, "image_url": "/9.png"}
    ])
}

#[tokio::test]
async fn test_recommendations_render_for_default_user() {
    let mut h = Harness::start().await;
    h.api
        .respond(Method::GET, "/recommendations/1", Canned::json(&two_products()));

    let html = body_text(h.hx_get("/fragments/recommendations").await).await;
    assert_eq!(html.matches("class=\"recommendation-card\"").count(), 2);
    assert!(html.contains("$249.99"));

    let requests = h.api.requests_to(&Method::GET, "/recommendations/1");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, None);
}

#[tokio::test]
async fn test_recommendations_forward_method_and_product() {
    let mut h = Harness::start().await;
    h.api
        .respond(Method::GET, "/recommendations/1", Canned::json(&json!([])));

    let response = h
        .hx_get("/fragments/recommendations?method=collaborative&product_id=12")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let requests = h.api.requests_to(&Method::GET, "/recommendations/1");
    assert_eq!(
        requests[0].query.as_deref(),
        Some("method=collaborative&product_id=12")
    );
}

#[tokio::test]
async fn test_configured_default_method_is_sent() {
    let mut h = Harness::with_env(&[
        ("STOREFRONT_RECOMMENDATION_METHOD", "hybrid"),
        ("STOREFRONT_DEFAULT_USER_ID", "5"),
    ])
    .await;
    h.api
        .respond(Method::GET, "/recommendations/5", Canned::json(&json!([])));

    h.hx_get("/fragments/recommendations").await;

    let requests = h.api.requests_to(&Method::GET, "/recommendations/5");
    assert_eq!(requests[0].query.as_deref(), Some("method=hybrid"));
}

#[tokio::test]
async fn test_unauthorized_recommendations_redirect_to_login() {
    let mut h = Harness::start().await;
    h.api.respond(
        Method::GET,
        "/recommendations/1",
        Canned::status(StatusCode::UNAUTHORIZED, r#"{"error": "login required"}"#),
    );

    let response = h.hx_get("/fragments/recommendations").await;
    assert_eq!(response.headers()["hx-redirect"], "/login");
}

#[tokio::test]
async fn test_failed_recommendations_render_empty() {
    let mut h = Harness::start().await;
    h.api.respond(
        Method::GET,
        "/recommendations/1",
        Canned::status(StatusCode::INTERNAL_SERVER_ERROR, "{}"),
    );

    let response = h.hx_get("/fragments/recommendations").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("hx-redirect").is_none());
    assert!(body_text(response).await.trim().is_empty());
}

#[tokio::test]
async fn test_probe_unauthorized_redirects_even_with_invalid_body() {
    let mut h = Harness::start().await;
    h.api.respond(
        Method::GET,
        "/recommendations/1",
        Canned::status(StatusCode::UNAUTHORIZED, "<html>not json</html>"),
    );

    let response = h.hx_get("/fragments/session-probe").await;
    assert_eq!(response.headers()["hx-redirect"], "/login");
}

#[tokio::test]
async fn test_probe_unauthorized_plain_request_gets_see_other() {
    let mut h = Harness::start().await;
    h.api.respond(
        Method::GET,
        "/recommendations/1",
        Canned::status(StatusCode::UNAUTHORIZED, ""),
    );

    let response = h
        .send(
            axum::http::Request::get("/fragments/session-probe")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_probe_success_does_not_navigate() {
    let mut h = Harness::start().await;
    h.api
        .respond(Method::GET, "/recommendations/1", Canned::json(&two_products()));

    let response = h.hx_get("/fragments/session-probe").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.headers().get("hx-redirect").is_none());
    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn test_probe_uses_configured_user_and_login_path() {
    let mut h = Harness::with_env(&[
        ("STOREFRONT_PROBE_USER_ID", "42"),
        ("STOREFRONT_LOGIN_PATH", "/signin"),
    ])
    .await;
    h.api.respond(
        Method::GET,
        "/recommendations/42",
        Canned::status(StatusCode::UNAUTHORIZED, ""),
    );

    let response = h.hx_get("/fragments/session-probe").await;
    assert_eq!(response.headers()["hx-redirect"], "/signin");
    assert_eq!(h.api.requests_to(&Method::GET, "/recommendations/42").len(), 1);
}

#[tokio::test]
async fn test_home_page_and_fragments_call_recommendations_twice() {
    let mut h = Harness::start().await;
    h.api
        .respond(Method::GET, "/recommendations/1", Canned::json(&two_products()));

    let html = body_text(h.hx_get("/").await).await;
    assert!(html.contains("/fragments/session-probe"));
    assert!(html.contains("/fragments/recommendations"));

    h.hx_get("/fragments/recommendations").await;
    h.hx_get("/fragments/session-probe").await;
    assert_eq!(h.api.requests_to(&Method::GET, "/recommendations/1").len(), 2);
}
