//! Normalized ranked match record.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One historical ranked match, as seen from the tracked player's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// When the match was played
    pub timestamp: NaiveDateTime,

    /// Calendar day of `timestamp`
    pub date: NaiveDate,

    /// Character the player used
    pub character: String,

    /// Raw score token (e.g. "3-1")
    pub score: String,

    /// Whether the player won
    pub is_win: bool,

    /// Player rating entering the match
    pub rating: i32,

    /// Signed rating delta applied by the match
    pub rating_change: i32,

    /// `rating + rating_change`
    pub new_rating: i32,

    /// Opponent display name, empty when the markup has no link
    pub opponent_name: String,

    /// Opponent's character
    pub opponent_char: String,

    pub opponent_rating: i32,
    pub opponent_rating_change: i32,
    pub new_opponent_rating: i32,
}

impl MatchRecord {
    /// Create a record with every field besides the timestamp defaulted.
    pub fn new(timestamp: NaiveDateTime, character: impl Into<String>) -> Self {
        Self {
            timestamp,
            date: timestamp.date(),
            character: character.into(),
            score: String::new(),
            is_win: false,
            rating: 0,
            rating_change: 0,
            new_rating: 0,
            opponent_name: String::new(),
            opponent_char: String::new(),
            opponent_rating: 0,
            opponent_rating_change: 0,
            new_opponent_rating: 0,
        }
    }

    /// Builder method to set the score token and result.
    pub fn with_score(mut self, score: impl Into<String>, is_win: bool) -> Self {
        self.score = score.into();
        self.is_win = is_win;
        self
    }

    /// Builder method to set the player's rating and delta.
    ///
    /// A delta that would overflow the rating is dropped (treated as 0).
    pub fn with_rating(mut self, rating: i32, change: i32) -> Self {
        let (change, new_rating) = apply_change(rating, change);
        self.rating = rating;
        self.rating_change = change;
        self.new_rating = new_rating;
        self
    }

    /// Builder method to set the opponent's identity.
    pub fn with_opponent(mut self, name: impl Into<String>, character: impl Into<String>) -> Self {
        self.opponent_name = name.into();
        self.opponent_char = character.into();
        self
    }

    /// Builder method to set the opponent's rating and delta.
    pub fn with_opponent_rating(mut self, rating: i32, change: i32) -> Self {
        let (change, new_rating) = apply_change(rating, change);
        self.opponent_rating = rating;
        self.opponent_rating_change = change;
        self.new_opponent_rating = new_rating;
        self
    }
}

/// `(change, rating + change)`, or `(0, rating)` when the sum overflows.
fn apply_change(rating: i32, change: i32) -> (i32, i32) {
    match rating.checked_add(change) {
        Some(new_rating) => (change, new_rating),
        None => {
            debug!("Rating change {} overflows rating {}, defaulting to 0", change, rating);
            (0, rating)
        }
    }
}
