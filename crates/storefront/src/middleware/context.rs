//! Session context extractor.
//!
//! Builds the [`SessionContext`] passed into every upstream API call from the
//! tower-sessions session, falling back to the configured default user id.

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;

use recshop_core::UserId;

use crate::api::LoginOutcome;
use crate::models::{SessionContext, session_keys};
use crate::state::AppState;

/// Extractor for the current visitor's session context.
///
/// Never rejects: visitors without a stored login get an anonymous context
/// for the configured default user id, and the upstream API decides whether
/// that is acceptable.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     State(state): State<AppState>,
///     CurrentSession(ctx): CurrentSession,
/// ) -> impl IntoResponse {
///     state.api().list_products(&ctx).await
/// }
/// ```
pub struct CurrentSession(pub SessionContext);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let default_user_id = state.config().session.default_user_id;

        let Some(session) = parts.extensions.get::<Session>() else {
            tracing::warn!("Session not found in request extensions - layer may be missing");
            return Ok(Self(SessionContext::anonymous(default_user_id)));
        };

        Ok(Self(load_context(session, default_user_id).await))
    }
}

/// Read the stored session context, tolerating store errors.
async fn load_context(session: &Session, default_user_id: UserId) -> SessionContext {
    let user_id = session
        .get::<UserId>(session_keys::USER_ID)
        .await
        .ok()
        .flatten()
        .unwrap_or(default_user_id);

    let api_cookie = session
        .get::<String>(session_keys::API_COOKIE)
        .await
        .ok()
        .flatten()
        .map(SecretString::from);

    SessionContext::new(user_id, api_cookie)
}

/// Store a successful login in the session.
///
/// Replaces whatever a previous login stored: a user id or cookie the new
/// login does not supply falls back to the anonymous default.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_login(
    session: &Session,
    outcome: &LoginOutcome,
) -> Result<(), tower_sessions::session::Error> {
    // New privilege level, new session id
    session.cycle_id().await?;
    session.remove_value(session_keys::USER_ID).await?;
    session.remove_value(session_keys::API_COOKIE).await?;

    if let Some(user_id) = outcome.user_id {
        session.insert(session_keys::USER_ID, user_id).await?;
    }
    if let Some(cookie) = &outcome.api_cookie {
        session
            .insert(session_keys::API_COOKIE, cookie.expose_secret())
            .await?;
    }
    Ok(())
}

/// Drop everything the session holds (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be flushed.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
