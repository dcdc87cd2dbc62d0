use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::character_stats as compute_character_stats;
use crate::fetch::validate_player_id;
use crate::models::{CharacterStats, DateRange};

use super::extract_history_and_ratings;

#[derive(Debug, Deserialize)]
pub struct CharacterStatsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CharacterStatsResponse {
    pub player_id: String,
    pub date_range: Option<DateRange>,
    pub characters: BTreeMap<String, CharacterStats>,
}

pub async fn character_stats(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Query(params): Query<CharacterStatsParams>,
) -> Result<Json<CharacterStatsResponse>, ApiError> {
    let player_id = validate_player_id(&player_id)?.to_string();
    let date_range =
        DateRange::parse_bounds(params.start_date.as_deref(), params.end_date.as_deref())?;

    info!("Character stats for {}", player_id);
    let markup = state.source.fetch_player_page(&player_id).await?;

    let (history, ratings) = extract_history_and_ratings(&markup, &state.columns)?;
    let characters = compute_character_stats(&history.filter_range(date_range.as_ref()), &ratings);

    Ok(Json(CharacterStatsResponse {
        player_id,
        date_range,
        characters,
    }))
}
