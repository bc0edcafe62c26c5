//! Authentication route handlers.
//!
//! Login and registration are plain form posts forwarded to the API. A
//! successful login stores the API's session cookie and user id in the
//! storefront session; logout clears both.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{ApiError, Credentials, Registration};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{CurrentSession, HxRequest, clear_session, store_login};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// Turn an error code from the query string into a user-facing message.
///
/// Unknown codes are dropped rather than echoed back.
fn error_message(code: Option<&str>) -> Option<String> {
    let message = match code? {
        "credentials" => "Invalid email or password.",
        "unavailable" => "The store is unavailable right now. Please try again later.",
        "failed" => "Could not create your account. Please try again.",
        _ => return None,
    };
    Some(message.to_string())
}


// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: error_message(query.error.as_deref()),
        notice: None,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    hx: HxRequest,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let credentials = Credentials {
        email: form.email,
        password: SecretString::from(form.password),
    };

    match state.api().login(&credentials).await {
        Ok(outcome) => {
            store_login(&session, &outcome).await?;
            if let Some(user_id) = outcome.user_id {
                set_sentry_user(&user_id);
            }
            tracing::info!(message = %outcome.message, "Logged in");
            Ok(hx.navigate("/"))
        }
        Err(ApiError::Unauthorized) => {
            tracing::info!("Login rejected");
            Ok(Redirect::to("/login?error=credentials").into_response())
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Ok(Redirect::to("/login?error=unavailable").into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: error_message(query.error.as_deref()),
    }
}

/// Handle registration form submission.
///
/// On success the login page is shown with the API's confirmation message.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let registration = Registration {
        username: form.username,
        email: form.email,
        password: SecretString::from(form.password),
    };

    match state.api().register(&registration).await {
        Ok(response) => LoginTemplate {
            error: None,
            notice: Some(response.message),
        }
        .into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            Redirect::to("/register?error=failed").into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out.
///
/// The page reloads whatever the API answers; a failed upstream logout is
/// only logged. The local session is cleared either way, and only a session
/// store failure turns into an error response.
#[instrument(skip(state, session, context, hx))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    CurrentSession(context): CurrentSession,
    hx: HxRequest,
) -> Result<Response> {
    if let Err(e) = state.api().logout(&context).await {
        tracing::warn!("Upstream logout failed: {e}");
    }

    clear_session(&session).await?;
    clear_sentry_user();

    Ok(hx.reload())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_map_to_messages() {
        assert_eq!(
            error_message(Some("credentials")).as_deref(),
            Some("Invalid email or password.")
        );
        assert!(error_message(Some("<script>")).is_none());
        assert!(error_message(None).is_none());
    }

    #[test]
    fn test_login_page_shows_notice() {
        let html = LoginTemplate {
            error: None,
            notice: Some("User registered successfully!".to_string()),
        }
        .render()
        .unwrap();
        assert!(html.contains("User registered successfully!"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_register_page_renders_fields() {
        let html = RegisterTemplate { error: None }.render().unwrap();
        for field in ["name=\"username\"", "name=\"email\"", "name=\"password\""] {
            assert!(html.contains(field), "missing {field}");
        }
    }
}
