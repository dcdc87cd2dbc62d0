//! REST API endpoints.
//!
//! Axum-based HTTP API serving the aggregate views of a player's ranked
//! match history. Every request fetches and parses the player page afresh.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::CalculateError;
use crate::extract::ExtractError;
use crate::fetch::FetchError;
use crate::models::DateRangeError;
use state::AppState;

/// Example request shown in usage hints.
pub const EXAMPLE_REQUEST: &str =
    "/api/visualize?player_id=3BgbnRiDAaMa&character=Azucena&graph=daily_gains";

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Missing parameters: {}", .0.join(", "))]
    MissingParams(Vec<&'static str>),

    #[error("Could not fetch player page: {0}")]
    UpstreamFetch(String),

    #[error("{0}")]
    UpstreamFormat(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_request: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::MissingParams(_) => (StatusCode::BAD_REQUEST, "MISSING_PARAMS"),
            ApiError::UpstreamFetch(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_FETCH"),
            ApiError::UpstreamFormat(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_FORMAT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::warn!("{}", self);
        }

        let example_request = matches!(self, ApiError::MissingParams(_))
            .then(|| EXAMPLE_REQUEST.to_string());

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                example_request,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        ApiError::UpstreamFormat(e.to_string())
    }
}

impl From<DateRangeError> for ApiError {
    fn from(e: DateRangeError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<CalculateError> for ApiError {
    fn from(e: CalculateError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::InvalidPlayerId(_) => ApiError::BadRequest(e.to_string()),
            FetchError::HttpStatus { status: 404, .. } => {
                ApiError::NotFound("No player page for the given player ID.".to_string())
            }
            other => ApiError::UpstreamFetch(other.to_string()),
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(usage))
        .route("/api/visualize", get(routes::visualize::visualize))
        .route(
            "/api/players/:player_id/characters",
            get(routes::characters::character_stats),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for read-only access from `origin` ("*" for any).
pub fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin {
        "*" => AllowOrigin::any(),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin '{}', allowing any", origin);
                AllowOrigin::any()
            }
        },
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
}

async fn usage() -> Html<String> {
    Html(format!(
        r#"<html>
<head><title>Ranked Visualizer API</title></head>
<body>
<h1>Ranked Visualizer API</h1>
<p>Statistics computed from a player's ranked match history.</p>
<h2>Usage</h2>
<p>Send a GET request to <code>/api/visualize</code> with:</p>
<ul>
  <li><code>player_id</code>: the player's ID</li>
  <li><code>character</code>: the character to analyze</li>
  <li><code>graph</code>: <code>daily_gains</code>, <code>win_rates</code> or <code>distribution</code></li>
  <li><code>start_date</code>, <code>end_date</code> (optional, together, <code>YYYY-MM-DD</code>)</li>
  <li><code>include_total</code> (optional): add a Total row to <code>win_rates</code></li>
</ul>
<p>Per-character win rates and current ratings: <code>/api/players/{{player_id}}/characters</code>.</p>
<h3>Example</h3>
<p><code><a href="{example}">{example}</a></code></p>
</body>
</html>"#,
        example = EXAMPLE_REQUEST
    ))
}
