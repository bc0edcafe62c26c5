//! Integration test harness for the Recshop storefront.
//!
//! [`FakeApi`] is a small axum server on an ephemeral port that stands in for
//! the Recshop API: it answers with canned responses and records every
//! request it receives. [`Harness`] points a storefront router at it and
//! drives the router in-process with `tower::ServiceExt::oneshot`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p recshop-integration-tests
//! ```

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;

use recshop_storefront::{config::StorefrontConfig, routes, state::AppState};

/// A request the fake API received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The body parsed as JSON (`Null` when it is not JSON).
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or_default()
    }
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Canned {
    /// `200` with a JSON body.
    #[must_use]
    pub fn json(value: &serde_json::Value) -> Self {
        Self::status(StatusCode::OK, &value.to_string())
    }

    /// Any status with a raw body.
    #[must_use]
    pub fn status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    /// Add a response header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

impl IntoResponse for Canned {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) = (
                header::HeaderName::from_bytes(name.as_bytes()),
                header::HeaderValue::from_str(&value),
            ) {
                response.headers_mut().append(name, value);
            }
        }
        response
    }
}

#[derive(Default)]
struct FakeState {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<HashMap<(Method, String), VecDeque<Canned>>>,
}

/// A fake Recshop API.
///
/// Responses are queued per method and path. Each request takes the next
/// queued response; the last one repeats. Unknown routes answer `404`.
pub struct FakeApi {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeApi {
    /// Start the server on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        #[allow(clippy::expect_used)]
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        #[allow(clippy::expect_used)]
        let addr = listener.local_addr().expect("Fake API has no address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Base URL to configure the storefront with.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Queue a response for `method path`.
    pub fn respond(&self, method: Method, path: &str, response: Canned) {
        self.state
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == *method && r.path == path)
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();

    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(String::from),
            cookie: headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            body: String::from_utf8_lossy(&body).into_owned(),
        });

    let canned = {
        let mut responses = state
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        responses.get_mut(&(method, path)).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    canned.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        IntoResponse::into_response,
    )
}

/// A storefront router wired to a [`FakeApi`].
pub struct Harness {
    pub api: FakeApi,
    app: Router,
    session_cookie: Option<String>,
}

impl Harness {
    /// Start a fake API and a storefront pointed at it.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be configured.
    pub async fn start() -> Self {
        Self::with_env(&[]).await
    }

    /// Like [`Harness::start`], with extra environment variables.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be configured.
    pub async fn with_env(vars: &[(&str, &str)]) -> Self {
        let api = FakeApi::start().await;
        let mut env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        env.insert("RECSHOP_API_URL".to_string(), api.url());

        #[allow(clippy::expect_used)]
        let config = StorefrontConfig::from_lookup(|key| env.get(key).cloned())
            .expect("Invalid test configuration");
        #[allow(clippy::expect_used)]
        let state = AppState::new(config).expect("Failed to build state");

        Self {
            api,
            app: routes::app(state),
            session_cookie: None,
        }
    }

    /// Send a request, carrying the storefront session cookie once one is set.
    ///
    /// # Panics
    ///
    /// Panics if the router fails, which it never does for a valid request.
    pub async fn send(&mut self, request: Request<Body>) -> Response {
        let mut request = request;
        if let Some(cookie) = &self.session_cookie {
            #[allow(clippy::expect_used)]
            let value = header::HeaderValue::from_str(cookie).expect("Invalid cookie");
            request.headers_mut().insert(header::COOKIE, value);
        }

        #[allow(clippy::expect_used)]
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.session_cookie = Some(set_cookie.to_string());
        }

        response
    }

    /// `GET` as HTMX would issue it.
    pub async fn hx_get(&mut self, path: &str) -> Response {
        self.send(hx_request(Method::GET, path, Body::empty(), None))
            .await
    }

    /// Form `POST` as HTMX would issue it.
    pub async fn hx_post_form(&mut self, path: &str, form: &str) -> Response {
        self.send(hx_request(
            Method::POST,
            path,
            Body::from(form.to_string()),
            Some("application/x-www-form-urlencoded"),
        ))
        .await
    }

    /// Plain browser form `POST` (no HTMX headers).
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid URI.
    pub async fn post_form(&mut self, path: &str, form: &str) -> Response {
        #[allow(clippy::expect_used)]
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("Invalid request");
        self.send(request).await
    }
}

fn hx_request(method: Method, path: &str, body: Body, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("hx-request", "true");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    #[allow(clippy::expect_used)]
    builder.body(body).expect("Invalid request")
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
pub async fn body_text(response: Response) -> String {
    #[allow(clippy::expect_used)]
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8_lossy(&bytes).into_owned()
}
