//! Account commands.
//!
//! The API keeps its session in a cookie. `login --print-cookie` shows it so
//! it can be exported as `RECSHOP_API_COOKIE` for later commands.

use secrecy::{ExposeSecret, SecretString};

use recshop_storefront::api::{Credentials, Registration};

use super::{CommandError, Connection};

/// Log in.
///
/// # Errors
///
/// Returns an error if the API rejects the credentials or the call fails.
pub async fn login(
    conn: &Connection,
    email: String,
    password: String,
    print_cookie: bool,
) -> Result<(), CommandError> {
    let credentials = Credentials {
        email,
        password: SecretString::from(password),
    };
    let outcome = conn.client.login(&credentials).await?;

    tracing::info!("{}", outcome.message);
    if let Some(user_id) = outcome.user_id {
        tracing::info!("User ID: {user_id}");
    }

    match (&outcome.api_cookie, print_cookie) {
        (Some(cookie), true) => tracing::info!("RECSHOP_API_COOKIE={}", cookie.expose_secret()),
        (None, true) => tracing::warn!("The API did not set a session cookie"),
        _ => {}
    }
    Ok(())
}

/// Register a new account.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn register(
    conn: &Connection,
    username: String,
    email: String,
    password: String,
) -> Result<(), CommandError> {
    let registration = Registration {
        username,
        email,
        password: SecretString::from(password),
    };
    let response = conn.client.register(&registration).await?;
    tracing::info!("{}", response.message);
    Ok(())
}

/// End the API session.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn logout(conn: &Connection) -> Result<(), CommandError> {
    conn.client.logout(&conn.session).await?;
    tracing::info!("Logged out");
    Ok(())
}
