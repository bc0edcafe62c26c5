//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RECSHOP_API_URL` - Base URL of the upstream catalog/cart API
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `STOREFRONT_DEFAULT_USER_ID` - User id used until the API supplies one (default: 1)
//! - `STOREFRONT_PROBE_USER_ID` - User id for the session probe request (default: 1)
//! - `STOREFRONT_LOGIN_PATH` - Where unauthenticated visitors are sent (default: /login)
//! - `STOREFRONT_RECOMMENDATION_METHOD` - `hybrid` or `collaborative` (default: server's choice)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use recshop_core::{RecommendationMethod, UserId};
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: String,
    /// Upstream API configuration
    pub api: ApiConfig,
    /// Session defaults and auth redirect behaviour
    pub session: SessionConfig,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Upstream API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, always ending in `/` so relative endpoint paths join onto it.
    pub base_url: Url,
}

/// Session defaults.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// User id for visitors the API has not identified yet.
    pub default_user_id: UserId,
    /// User id requested by the session probe.
    pub probe_user_id: UserId,
    /// Path visitors are sent to when the API answers `401`.
    pub login_path: String,
    /// Recommendation strategy requested when the page does not specify one.
    pub recommendation_method: Option<RecommendationMethod>,
}

/// Sentry configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(&lookup);

        let host = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parse_or("STOREFRONT_PORT", "3000")?;
        let base_url = env.or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let static_dir = env.or_default("STOREFRONT_STATIC_DIR", "crates/storefront/static");

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            api: ApiConfig::from_lookup(&env)?,
            session: SessionConfig::from_lookup(&env)?,
            sentry: SentryConfig::from_lookup(&env)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    /// Build an API configuration from a base URL string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is not HTTP(S).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEnvVar("RECSHOP_API_URL".to_string(), reason);

        let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { base_url: url })
    }

    fn from_lookup(env: &Lookup<'_>) -> Result<Self, ConfigError> {
        Self::new(&env.required("RECSHOP_API_URL")?)
    }
}

impl SessionConfig {
    fn from_lookup(env: &Lookup<'_>) -> Result<Self, ConfigError> {
        let recommendation_method = env
            .optional("STOREFRONT_RECOMMENDATION_METHOD")
            .map(|value| {
                value.parse::<RecommendationMethod>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "STOREFRONT_RECOMMENDATION_METHOD".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        let login_path = env.or_default("STOREFRONT_LOGIN_PATH", "/login");
        if !login_path.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_LOGIN_PATH".to_string(),
                "must be an absolute path".to_string(),
            ));
        }

        Ok(Self {
            default_user_id: env.parse_or("STOREFRONT_DEFAULT_USER_ID", "1")?,
            probe_user_id: env.parse_or("STOREFRONT_PROBE_USER_ID", "1")?,
            login_path,
            recommendation_method,
        })
    }
}

impl SentryConfig {
    fn from_lookup(env: &Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source shared by the section loaders.
struct Lookup<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Lookup<'_> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default) into `T`.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_missing_api_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "RECSHOP_API_URL"));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("RECSHOP_API_URL", "http://api.local:5000")]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.session.default_user_id, UserId::new(1));
        assert_eq!(config.session.probe_user_id, UserId::new(1));
        assert_eq!(config.session.login_path, "/login");
        assert!(config.session.recommendation_method.is_none());
        assert!(config.sentry.dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_api_url_gets_trailing_slash() {
        let config = load(&[("RECSHOP_API_URL", "http://api.local:5000/shop")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://api.local:5000/shop/");

        let joined = config.api.base_url.join("api/products").unwrap();
        assert_eq!(joined.as_str(), "http://api.local:5000/shop/api/products");
    }

    #[test]
    fn test_api_url_rejects_other_schemes() {
        let err = load(&[("RECSHOP_API_URL", "ftp://api.local")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[
            ("RECSHOP_API_URL", "http://api.local"),
            ("STOREFRONT_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_session_overrides() {
        let config = load(&[
            ("RECSHOP_API_URL", "http://api.local"),
            ("STOREFRONT_DEFAULT_USER_ID", "7"),
            ("STOREFRONT_PROBE_USER_ID", "2"),
            ("STOREFRONT_LOGIN_PATH", "/account/login"),
            ("STOREFRONT_RECOMMENDATION_METHOD", "collaborative"),
        ])
        .unwrap();

        assert_eq!(config.session.default_user_id, UserId::new(7));
        assert_eq!(config.session.probe_user_id, UserId::new(2));
        assert_eq!(config.session.login_path, "/account/login");
        assert_eq!(
            config.session.recommendation_method,
            Some(RecommendationMethod::Collaborative)
        );
    }

    #[test]
    fn test_relative_login_path_rejected() {
        let err = load(&[
            ("RECSHOP_API_URL", "http://api.local"),
            ("STOREFRONT_LOGIN_PATH", "login"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_unknown_recommendation_method() {
        let err = load(&[
            ("RECSHOP_API_URL", "http://api.local"),
            ("STOREFRONT_RECOMMENDATION_METHOD", "random"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, msg) if msg.contains("random")));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = load(&[
            ("RECSHOP_API_URL", "http://api.local"),
            ("SENTRY_DSN", ""),
            ("STOREFRONT_PORT", " "),
        ])
        .unwrap();
        assert!(config.sentry.dsn.is_none());
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = load(&[
            ("RECSHOP_API_URL", "http://api.local"),
            ("STOREFRONT_BASE_URL", "https://shop.example"),
        ])
        .unwrap();
        assert!(config.is_secure());
    }
}
