//! Recommendations panel and session probe fragments.
//!
//! Both hit `GET /recommendations/{user_id}` upstream. The panel renders the
//! result into `#recommendations`; the probe only checks the status code and
//! sends the visitor to the login page on `401`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, instrument};

use recshop_core::{ProductId, RecommendationMethod};

use super::catalog::ProductCardsTemplate;
use crate::api::{ApiError, RecommendationQuery, SessionStatus};
use crate::error::AppError;
use crate::middleware::{CurrentSession, HxRequest};
use crate::state::AppState;

/// Card class for recommended products.
pub const RECOMMENDATION_CARD_CLASS: &str = "recommendation-card";

/// Query parameters accepted by the panel (and forwarded from the home page).
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    pub method: Option<String>,
    pub product_id: Option<i64>,
}

impl RecommendationParams {
    /// Validate into an upstream query, filling in the configured default method.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown method.
    pub fn into_query(
        self,
        default_method: Option<RecommendationMethod>,
    ) -> Result<RecommendationQuery, AppError> {
        let method = match self.method.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(
                value
                    .parse::<RecommendationMethod>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            ),
            _ => default_method,
        };

        Ok(RecommendationQuery {
            method,
            product_id: self.product_id.map(ProductId::new),
        })
    }
}

/// Render recommendations for the session's user.
///
/// `401` sends the visitor to the login page; any other failure leaves the
/// panel empty.
#[instrument(skip(state, session, hx))]
pub async fn show(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    hx: HxRequest,
    Query(params): Query<RecommendationParams>,
) -> Result<Response, AppError> {
    let query = params.into_query(state.config().session.recommendation_method)?;

    let recommendations = match state
        .api()
        .recommendations(&session, session.user_id(), &query)
        .await
    {
        Ok(recommendations) => recommendations,
        Err(ApiError::Unauthorized) => {
            debug!("Recommendations rejected the session, sending to login");
            return Ok(hx.navigate(&state.config().session.login_path));
        }
        Err(e) => {
            tracing::warn!("Failed to fetch recommendations: {e}");
            Vec::new()
        }
    };

    Ok(ProductCardsTemplate::new(RECOMMENDATION_CARD_CLASS, &recommendations).into_response())
}

/// Probe the upstream session.
///
/// Renders nothing. `401` sends the visitor to the login page without the
/// body being read; any other body is logged and discarded.
#[instrument(skip(state, session, hx))]
pub async fn probe(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    hx: HxRequest,
) -> Response {
    let probe_user_id = state.config().session.probe_user_id;

    match state.api().probe_session(&session, probe_user_id).await {
        Ok(SessionStatus::Unauthorized) => {
            debug!("Session probe unauthorized, sending to login");
            hx.navigate(&state.config().session.login_path)
        }
        Ok(SessionStatus::Active(body)) => {
            debug!(body = %body, "Session probe succeeded");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::warn!("Session probe failed: {e}");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_method_applies() {
        let query = RecommendationParams::default()
            .into_query(Some(RecommendationMethod::Collaborative))
            .unwrap();
        assert_eq!(query.method, Some(RecommendationMethod::Collaborative));
        assert_eq!(query.product_id, None);
    }

    #[test]
    fn test_params_explicit_method_wins() {
        let params = RecommendationParams {
            method: Some("hybrid".to_string()),
            product_id: Some(101),
        };
        let query = params
            .into_query(Some(RecommendationMethod::Collaborative))
            .unwrap();
        assert_eq!(query.method, Some(RecommendationMethod::Hybrid));
        assert_eq!(query.product_id, Some(ProductId::new(101)));
    }

    #[test]
    fn test_params_blank_method_is_unset() {
        let params = RecommendationParams {
            method: Some("  ".to_string()),
            product_id: None,
        };
        assert!(params.into_query(None).unwrap().is_empty());
    }

    #[test]
    fn test_params_unknown_method_is_bad_request() {
        let params = RecommendationParams {
            method: Some("svd".to_string()),
            product_id: None,
        };
        assert!(matches!(
            params.into_query(None),
            Err(AppError::BadRequest(_))
        ));
    }
}
