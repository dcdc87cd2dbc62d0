//! Aggregate view models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CurrentRating;

/// Result of an aggregate view.
///
/// `NoData` is a normal outcome (the character or window has no matches) and
/// is distinct from both an error and an empty/zero-filled chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Aggregate<T> {
    Ok(T),
    NoData,
}

impl<T> Aggregate<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Aggregate::NoData)
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Aggregate::Ok(data) => Some(data),
            Aggregate::NoData => None,
        }
    }
}

/// End-of-day rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub date: NaiveDate,
    pub rating: i32,
}

/// Win rate against one opponent character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentWinRate {
    pub opponent_char: String,

    /// Win rate (0.0 to 100.0)
    pub win_rate_percent: f64,

    pub match_count: u32,
}

/// Share of matches played against one opponent character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentShare {
    pub opponent_char: String,

    /// Share of matches (0.0 to 100.0)
    pub percent: f64,

    pub match_count: u32,
}

/// Per-character summary paired with the ratings snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterStats {
    /// Win rate (0.0 to 1.0)
    pub win_rate: f64,

    pub total_games: u32,

    pub current_rating: CurrentRating,
}

/// Whether the win-rate view carries a synthetic "Total" row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalRow {
    #[default]
    Omit,
    /// Prepend a row covering every match in the view
    Prepend,
}

impl TotalRow {
    pub fn from_flag(include: bool) -> Self {
        if include {
            TotalRow::Prepend
        } else {
            TotalRow::Omit
        }
    }
}

/// Label of the synthetic total row.
pub const TOTAL_LABEL: &str = "Total";
