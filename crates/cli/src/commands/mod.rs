//! CLI command implementations.

pub mod account;
pub mod shop;

use recshop_storefront::api::{ApiClient, ApiError};
use recshop_storefront::config::{ApiConfig, ConfigError};
use recshop_storefront::models::SessionContext;
use recshop_core::UserId;
use secrecy::SecretString;
use thiserror::Error;

/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "RECSHOP_API_URL";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Configuration was invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Connection settings shared by every command.
pub struct Connection {
    pub client: ApiClient,
    pub session: SessionContext,
}

impl Connection {
    /// Connect using `RECSHOP_API_URL` and an optional replayed session cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is missing or invalid.
    pub fn from_env(user_id: UserId, cookie: Option<String>) -> Result<Self, CommandError> {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var(API_URL_VAR).map_err(|_| CommandError::MissingEnvVar(API_URL_VAR))?;
        let config = ApiConfig::new(&base_url)?;
        let client = ApiClient::new(&config)?;

        tracing::debug!(api = %client.base_url(), "Connected");

        Ok(Self {
            client,
            session: SessionContext::new(user_id, cookie.map(SecretString::from)),
        })
    }
}
