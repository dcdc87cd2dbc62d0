//! Statistics calculation engine.
//!
//! Pure functions over a [`MatchHistory`]:
//! - Daily rating trajectory
//! - Win rate by opponent character
//! - Opponent character distribution
//! - Per-character win rate paired with current ratings
//!
//! The three chart views expect a history already narrowed to one character
//! (see [`select_character`]) and return [`Aggregate::NoData`] when it is
//! empty.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Aggregate, CharacterStats, MatchHistory, OpponentShare, OpponentWinRate, RatingsSnapshot,
    TotalRow, TrajectoryPoint, TOTAL_LABEL,
};

/// Calculation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculateError {
    #[error("Invalid character: '{0}' has no matches for this player")]
    UnknownCharacter(String),
}

/// Narrow a player's history to one character.
///
/// The character must appear somewhere in `history`; check against the
/// unfiltered history so that an empty date window yields no data rather
/// than an error.
pub fn select_character(
    history: &MatchHistory,
    character: &str,
) -> Result<MatchHistory, CalculateError> {
    if !history.characters().contains(character) {
        return Err(CalculateError::UnknownCharacter(character.to_string()));
    }
    Ok(history.for_character(character))
}

/// Calculate win rate (0.0 to 1.0) from wins and total games.
pub fn calculate_win_rate(wins: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64
    }
}

/// Rating standing at the end of each day with at least one match.
pub fn daily_trajectory(history: &MatchHistory) -> Aggregate<Vec<TrajectoryPoint>> {
    if history.is_empty() {
        return Aggregate::NoData;
    }

    // History is timestamp-ordered, so the last write per date wins.
    let last_per_day: BTreeMap<_, _> = history
        .iter()
        .map(|r| (r.date, r.new_rating))
        .collect();

    Aggregate::Ok(
        last_per_day
            .into_iter()
            .map(|(date, rating)| TrajectoryPoint { date, rating })
            .collect(),
    )
}

#[derive(Default)]
struct Tally {
    wins: u32,
    games: u32,
}

impl Tally {
    fn add(&mut self, is_win: bool) {
        self.games += 1;
        if is_win {
            self.wins += 1;
        }
    }

    fn win_rate(&self) -> f64 {
        calculate_win_rate(self.wins, self.games)
    }
}

fn tally_by<'a>(
    history: &'a MatchHistory,
    key: impl Fn(&'a crate::models::MatchRecord) -> &'a str,
) -> BTreeMap<&'a str, Tally> {
    let mut groups: BTreeMap<&str, Tally> = BTreeMap::new();
    for record in history {
        groups.entry(key(record)).or_default().add(record.is_win);
    }
    groups
}

/// Win rate against each opponent character, in name order.
pub fn win_rate_by_opponent(
    history: &MatchHistory,
    total_row: TotalRow,
) -> Aggregate<Vec<OpponentWinRate>> {
    if history.is_empty() {
        return Aggregate::NoData;
    }

    let groups = tally_by(history, |r| r.opponent_char.as_str());
    let mut rows = Vec::with_capacity(groups.len() + 1);

    if total_row == TotalRow::Prepend {
        let mut total = Tally::default();
        for record in history {
            total.add(record.is_win);
        }
        rows.push(OpponentWinRate {
            opponent_char: TOTAL_LABEL.to_string(),
            win_rate_percent: total.win_rate() * 100.0,
            match_count: total.games,
        });
    }

    rows.extend(groups.into_iter().map(|(opponent, tally)| OpponentWinRate {
        opponent_char: opponent.to_string(),
        win_rate_percent: tally.win_rate() * 100.0,
        match_count: tally.games,
    }));

    Aggregate::Ok(rows)
}

/// Share of matches against each opponent character, most frequent first.
pub fn opponent_distribution(history: &MatchHistory) -> Aggregate<Vec<OpponentShare>> {
    if history.is_empty() {
        return Aggregate::NoData;
    }

    let total = history.len() as f64;
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for record in history {
        *counts.entry(record.opponent_char.as_str()).or_default() += 1;
    }

    let mut shares: Vec<OpponentShare> = counts
        .into_iter()
        .map(|(opponent, count)| OpponentShare {
            opponent_char: opponent.to_string(),
            percent: count as f64 / total * 100.0,
            match_count: count,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.match_count
            .cmp(&a.match_count)
            .then_with(|| a.opponent_char.cmp(&b.opponent_char))
    });

    Aggregate::Ok(shares)
}

/// Win rate of every character in `history`, with its current rating.
pub fn character_stats(
    history: &MatchHistory,
    ratings: &RatingsSnapshot,
) -> BTreeMap<String, CharacterStats> {
    tally_by(history, |r| r.character.as_str())
        .into_iter()
        .map(|(character, tally)| {
            let stats = CharacterStats {
                win_rate: tally.win_rate(),
                total_games: tally.games,
                current_rating: ratings.get(character),
            };
            (character.to_string(), stats)
        })
        .collect()
}

/// The chart views a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Graph {
    DailyGains,
    WinRates,
    Distribution,
}

impl Graph {
    pub const ALL: [Graph; 3] = [Graph::DailyGains, Graph::WinRates, Graph::Distribution];

    pub fn as_str(&self) -> &'static str {
        match self {
            Graph::DailyGains => "daily_gains",
            Graph::WinRates => "win_rates",
            Graph::Distribution => "distribution",
        }
    }
}

impl FromStr for Graph {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Graph::ALL
            .into_iter()
            .find(|g| g.as_str() == s.trim().replace('-', "_"))
            .ok_or_else(|| {
                format!(
                    "Invalid graph type '{}'. Use 'daily_gains', 'win_rates', or 'distribution'.",
                    s
                )
            })
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data of any chart view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GraphData {
    DailyGains(Vec<TrajectoryPoint>),
    WinRates(Vec<OpponentWinRate>),
    Distribution(Vec<OpponentShare>),
}

/// Compute `graph` over a single-character history.
pub fn compute_graph(
    graph: Graph,
    history: &MatchHistory,
    total_row: TotalRow,
) -> Aggregate<GraphData> {
    let data = match graph {
        Graph::DailyGains => daily_trajectory(history).into_data().map(GraphData::DailyGains),
        Graph::WinRates => win_rate_by_opponent(history, total_row)
            .into_data()
            .map(GraphData::WinRates),
        Graph::Distribution => opponent_distribution(history)
            .into_data()
            .map(GraphData::Distribution),
    };
    data.map_or(Aggregate::NoData, Aggregate::Ok)
}
