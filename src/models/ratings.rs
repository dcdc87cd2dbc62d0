//! Current per-character ratings.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// A character's current rating, or `Unknown` when the snapshot has no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentRating {
    Known(i32),
    Unknown,
}

impl Serialize for CurrentRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CurrentRating::Known(rating) => serializer.serialize_i32(*rating),
            CurrentRating::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl std::fmt::Display for CurrentRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurrentRating::Known(rating) => write!(f, "{}", rating),
            CurrentRating::Unknown => write!(f, "unknown"),
        }
    }
}

/// Character -> current rating, sourced from the page's ratings table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RatingsSnapshot {
    ratings: HashMap<String, i32>,
}

impl RatingsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rating; a repeated character overwrites the earlier value.
    pub fn insert(&mut self, character: impl Into<String>, rating: i32) {
        self.ratings.insert(character.into(), rating);
    }

    pub fn get(&self, character: &str) -> CurrentRating {
        self.ratings
            .get(character)
            .copied()
            .map_or(CurrentRating::Unknown, CurrentRating::Known)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
