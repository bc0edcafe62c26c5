//! Home page route handler.
//!
//! The page is a shell: every container loads its own fragment over HTMX.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;
use url::form_urlencoded;

use super::recommendations::RecommendationParams;
use crate::api::RecommendationQuery;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Path of the recommendations fragment.
pub const RECOMMENDATIONS_FRAGMENT: &str = "/fragments/recommendations";

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Fragment URL for `#recommendations`, including any query parameters.
    pub recommendations_url: String,
}

/// Build the recommendations fragment URL for a validated query.
#[must_use]
pub fn recommendations_url(query: &RecommendationQuery) -> String {
    let pairs = query.pairs();
    if pairs.is_empty() {
        return RECOMMENDATIONS_FRAGMENT.to_string();
    }

    let query_string = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{RECOMMENDATIONS_FRAGMENT}?{query_string}")
}

/// Display the home page.
///
/// `?method=` and `?product_id=` are forwarded to the recommendations panel.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<RecommendationParams>,
) -> Result<impl IntoResponse> {
    let query = params.into_query(state.config().session.recommendation_method)?;

    Ok(HomeTemplate {
        recommendations_url: recommendations_url(&query),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use recshop_core::{ProductId, RecommendationMethod};

    use super::*;

    #[test]
    fn test_recommendations_url_without_query() {
        assert_eq!(
            recommendations_url(&RecommendationQuery::default()),
            "/fragments/recommendations"
        );
    }

    #[test]
    fn test_recommendations_url_with_query() {
        let query = RecommendationQuery {
            method: Some(RecommendationMethod::Hybrid),
            product_id: Some(ProductId::new(7)),
        };
        assert_eq!(
            recommendations_url(&query),
            "/fragments/recommendations?method=hybrid&product_id=7"
        );
    }

    #[test]
    fn test_home_renders_every_container() {
        let html = HomeTemplate {
            recommendations_url: RECOMMENDATIONS_FRAGMENT.to_string(),
        }
        .render()
        .unwrap();

        for id in [
            "id=\"product-catalog\"",
            "id=\"recommendations\"",
            "id=\"cart-message\"",
            "id=\"cart-items\"",
        ] {
            assert!(html.contains(id), "missing {id}");
        }
        assert!(html.contains("hx-get=\"/fragments/session-probe\""));
        assert!(html.contains("hx-post=\"/logout\""));
    }
}
