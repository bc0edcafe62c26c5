//! Session-related types.
//!
//! The upstream API decides whether a session is valid; the storefront only
//! remembers which user id to ask about and which cookie to replay.

use std::fmt;

use secrecy::SecretString;

use recshop_core::UserId;

/// The current visitor's session context.
///
/// Passed explicitly into every upstream API call so no request reads
/// ambient global state.
#[derive(Clone)]
pub struct SessionContext {
    user_id: UserId,
    api_cookie: Option<SecretString>,
}

impl SessionContext {
    /// Create a session context.
    #[must_use]
    pub const fn new(user_id: UserId, api_cookie: Option<SecretString>) -> Self {
        Self {
            user_id,
            api_cookie,
        }
    }

    /// A visitor the API has not identified, using the configured default user id.
    #[must_use]
    pub const fn anonymous(user_id: UserId) -> Self {
        Self::new(user_id, None)
    }

    /// User id recommendations are requested for.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Upstream session cookie (`name=value; ...`) to replay, if logged in.
    #[must_use]
    pub const fn api_cookie(&self) -> Option<&SecretString> {
        self.api_cookie.as_ref()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("user_id", &self.user_id)
            .field(
                "api_cookie",
                &self.api_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Session keys for storefront data.
pub mod keys {
    /// Key for the user id the API reported at login.
    pub const USER_ID: &str = "user_id";

    /// Key for the upstream session cookie captured at login.
    pub const API_COOKIE: &str = "api_cookie";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_cookie() {
        let ctx = SessionContext::new(
            UserId::new(4),
            Some(SecretString::from("session=very-secret-value")),
        );
        let debug_output = format!("{ctx:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("very-secret-value"));
    }

    #[test]
    fn test_anonymous_has_no_cookie() {
        let ctx = SessionContext::anonymous(UserId::new(1));
        assert_eq!(ctx.user_id(), UserId::new(1));
        assert!(ctx.api_cookie().is_none());
    }
}
