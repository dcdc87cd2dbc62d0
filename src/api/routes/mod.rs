//! Route handlers.

pub mod characters;
pub mod visualize;

use crate::api::ApiError;
use crate::extract::{ColumnLayout, PlayerDocument};
use crate::models::{MatchHistory, RatingsSnapshot};

/// Full match history of a fetched page.
///
/// A page whose match table holds no rows is reported as not found, since
/// there is nothing to pick a character from.
pub(crate) fn extract_history(markup: &str, columns: &ColumnLayout) -> Result<MatchHistory, ApiError> {
    let history = PlayerDocument::parse(markup).match_history(columns, None)?;
    if history.is_empty() {
        return Err(ApiError::NotFound(
            "No data found for the given player ID.".to_string(),
        ));
    }
    Ok(history)
}

/// Full match history and ratings snapshot of a fetched page.
pub(crate) fn extract_history_and_ratings(
    markup: &str,
    columns: &ColumnLayout,
) -> Result<(MatchHistory, RatingsSnapshot), ApiError> {
    let document = PlayerDocument::parse(markup);
    let history = document.match_history(columns, None)?;
    let ratings = document.ratings()?;
    Ok((history, ratings))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::state::AppState;
    use crate::config::ViewConfig;
    use crate::extract::{ColumnLayout, FIXTURE_PAGE};
    use crate::fetch::{FetchError, PageSource};

    /// Serves the fixture page for every player except "missing" (404) and
    /// "broken" (a page without a match table).
    pub struct FixtureSource;

    #[async_trait]
    impl PageSource for FixtureSource {
        async fn fetch_player_page(&self, player_id: &str) -> Result<String, FetchError> {
            match player_id {
                "missing" => Err(FetchError::HttpStatus {
                    status: 404,
                    message: "Not Found".to_string(),
                }),
                "broken" => Ok("<html><body><h1>Maintenance</h1></body></html>".to_string()),
                _ => Ok(FIXTURE_PAGE.to_string()),
            }
        }
    }

    pub fn test_state(include_total: bool) -> AppState {
        AppState {
            source: Arc::new(FixtureSource),
            columns: Arc::new(ColumnLayout::default()),
            views: ViewConfig { include_total },
        }
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}
