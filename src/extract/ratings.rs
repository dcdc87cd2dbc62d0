//! Ratings snapshot table parsing.

use scraper::ElementRef;
use tracing::debug;

use super::locator::body_rows;
use super::row::leading_integer;
use crate::models::RatingsSnapshot;

/// Read `(character, rating)` from the first two cells of each body row.
///
/// Rows without a numeric rating are skipped. A character listed twice keeps
/// its last rating.
pub fn parse_ratings_table(table: &ElementRef) -> RatingsSnapshot {
    let mut snapshot = RatingsSnapshot::new();

    for (index, row) in body_rows(table).iter().enumerate() {
        let Some(character) = row.cell(0).map(|c| c.text.as_str()).filter(|s| !s.is_empty())
        else {
            debug!("Ratings row {}: no character name, skipping", index);
            continue;
        };

        let rating = row.cell(1).and_then(|c| leading_integer(&c.text));

        match rating {
            Some(rating) => snapshot.insert(character, rating),
            None => debug!("Ratings row {}: no rating for {}, skipping", index, character),
        }
    }

    if snapshot.is_empty() {
        debug!("Ratings table has no readable ratings");
    } else {
        debug!("Read ratings for {} characters", snapshot.len());
    }

    snapshot
}
