//! HTMX request detection and client-side navigation responses.
//!
//! Fragments are requested by HTMX, which cannot follow a plain redirect into
//! a full page. Navigation is therefore sent as `HX-Redirect` / `HX-Refresh`
//! headers for HTMX requests and as a `303 See Other` for everything else.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

/// Header HTMX sets on every request it issues.
pub const HX_REQUEST: &str = "hx-request";
/// Response header telling HTMX to navigate to a new page.
pub const HX_REDIRECT: &str = "hx-redirect";
/// Response header telling HTMX to reload the current page.
pub const HX_REFRESH: &str = "hx-refresh";
/// Response header telling HTMX to fire client-side events.
pub const HX_TRIGGER: &str = "hx-trigger";

/// Whether the request was issued by HTMX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = parts
            .headers
            .get(HX_REQUEST)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        Ok(Self(is_htmx))
    }
}

impl HxRequest {
    /// Send the browser to `path`.
    #[must_use]
    pub fn navigate(self, path: &str) -> Response {
        if self.0 {
            (StatusCode::OK, [(HX_REDIRECT, path)]).into_response()
        } else {
            Redirect::to(path).into_response()
        }
    }

    /// Reload the current page.
    #[must_use]
    pub fn reload(self) -> Response {
        if self.0 {
            (StatusCode::OK, [(HX_REFRESH, "true")]).into_response()
        } else {
            Redirect::to("/").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    #[test]
    fn test_navigate_htmx_sets_redirect_header() {
        let response = HxRequest(true).navigate("/login");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[HX_REDIRECT], "/login");
        assert!(response.headers().get(LOCATION).is_none());
    }

    #[test]
    fn test_navigate_plain_request_redirects() {
        let response = HxRequest(false).navigate("/login");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    #[test]
    fn test_reload() {
        let response = HxRequest(true).reload();
        assert_eq!(response.headers()[HX_REFRESH], "true");

        let response = HxRequest(false).reload();
        assert_eq!(response.headers()[LOCATION], "/");
    }
}
