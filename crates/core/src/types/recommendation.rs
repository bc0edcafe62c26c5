//! Recommendation strategies understood by the upstream API.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown recommendation method.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown recommendation method '{0}' (expected 'hybrid' or 'collaborative')")]
pub struct RecommendationMethodError(pub String);

/// Strategy the upstream recommender uses, sent as the `method` query parameter.
///
/// The server falls back to `hybrid` when the parameter is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMethod {
    /// Collaborative filtering blended with content similarity.
    #[default]
    Hybrid,
    /// Collaborative filtering only.
    Collaborative,
}

impl RecommendationMethod {
    /// Query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::Collaborative => "collaborative",
        }
    }
}

impl fmt::Display for RecommendationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationMethod {
    type Err = RecommendationMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Ok(Self::Hybrid),
            "collaborative" => Ok(Self::Collaborative),
            other => Err(RecommendationMethodError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Collaborative".parse::<RecommendationMethod>(),
            Ok(RecommendationMethod::Collaborative)
        );
        assert_eq!(
            " hybrid ".parse::<RecommendationMethod>(),
            Ok(RecommendationMethod::Hybrid)
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "svd".parse::<RecommendationMethod>().unwrap_err();
        assert_eq!(err, RecommendationMethodError("svd".to_string()));
    }

    #[test]
    fn test_query_value() {
        assert_eq!(RecommendationMethod::Collaborative.as_str(), "collaborative");
        assert_eq!(RecommendationMethod::default().to_string(), "hybrid");
    }
}
