//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills the span field, tags Sentry, echoes the header)
//! 4. Security headers
//! 5. Session layer (tower-sessions, in-memory store)

pub mod context;
pub mod htmx;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use context::{CurrentSession, clear_session, store_login};
pub use htmx::HxRequest;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
