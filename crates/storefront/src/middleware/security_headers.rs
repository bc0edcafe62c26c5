//! Security headers middleware.
//!
//! Product images come from arbitrary upstream URLs and HTMX is loaded from
//! its CDN, so the policy allows exactly those two external sources.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::htmx::HX_REQUEST;

/// Content security policy applied to every response.
///
/// ```text
/// default-src 'none';
/// script-src 'self' https://unpkg.com;
/// style-src 'self';
/// img-src 'self' https: data:;
/// connect-src 'self';
/// form-action 'self';
/// base-uri 'self';
/// frame-ancestors 'none'
/// ```
const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'none'; \
     script-src 'self' https://unpkg.com; \
     style-src 'self'; \
     img-src 'self' https: data:; \
     connect-src 'self'; \
     form-action 'self'; \
     base-uri 'self'; \
     frame-ancestors 'none'";

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: same-origin`
/// - `Content-Security-Policy` (see [`CONTENT_SECURITY_POLICY_VALUE`])
/// - `Cross-Origin-Opener-Policy: same-origin`
/// - `Cache-Control: no-store` on fragments, which are per-visitor
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let is_fragment = request.headers().contains_key(HX_REQUEST);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    if is_fragment {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_allows_htmx_cdn() {
        let script_src = CONTENT_SECURITY_POLICY_VALUE
            .split(';')
            .map(str::trim)
            .find(|directive| directive.starts_with("script-src"));
        assert!(script_src.is_some_and(|d| d.contains("https://unpkg.com")));
    }

    #[test]
    fn test_policy_allows_remote_images() {
        assert!(CONTENT_SECURITY_POLICY_VALUE.contains("img-src 'self' https: data:"));
    }
}
