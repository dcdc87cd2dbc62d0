use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{compute_graph, select_character, Graph, GraphData};
use crate::extract::ColumnLayout;
use crate::models::{Aggregate, DateRange, TotalRow};

use super::extract_history;

#[derive(Debug, Deserialize)]
pub struct VisualizeParams {
    pub player_id: Option<String>,
    pub character: Option<String>,
    pub graph: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub include_total: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct VisualizeResponse {
    pub player_id: String,
    pub character: String,
    pub graph: Graph,
    pub date_range: Option<DateRange>,
    pub result: Aggregate<GraphData>,
}

fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> &'a str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name);
            ""
        }
    }
}

pub async fn visualize(
    State(state): State<AppState>,
    Query(params): Query<VisualizeParams>,
) -> Result<Json<VisualizeResponse>, ApiError> {
    let mut missing = Vec::new();
    let player_id = required(&params.player_id, "player_id", &mut missing);
    let character = required(&params.character, "character", &mut missing);
    let graph = required(&params.graph, "graph", &mut missing);
    if !missing.is_empty() {
        return Err(ApiError::MissingParams(missing));
    }

    let graph: Graph = graph.parse().map_err(ApiError::BadRequest)?;
    let date_range =
        DateRange::parse_bounds(params.start_date.as_deref(), params.end_date.as_deref())?;
    let total_row = state.views.total_row(params.include_total);

    info!("Visualizing {} for {} ({})", graph, player_id, character);
    let markup = state.source.fetch_player_page(player_id).await?;

    let result = graph_for_page(
        &markup,
        &state.columns,
        character,
        graph,
        date_range.as_ref(),
        total_row,
    )?;
    if result.is_no_data() {
        debug!("No {} matches for {} in the requested window", character, player_id);
    }

    Ok(Json(VisualizeResponse {
        player_id: player_id.to_string(),
        character: character.to_string(),
        graph,
        date_range,
        result,
    }))
}

fn graph_for_page(
    markup: &str,
    columns: &ColumnLayout,
    character: &str,
    graph: Graph,
    date_range: Option<&DateRange>,
    total_row: TotalRow,
) -> Result<Aggregate<GraphData>, ApiError> {
    let history = extract_history(markup, columns)?;
    let matches = select_character(&history, character)?.filter_range(date_range);
    Ok(compute_graph(graph, &matches, total_row))
}
