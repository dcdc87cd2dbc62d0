//! Extraction of match history and ratings from a player page.
//!
//! - **locator**: finds the match and ratings tables
//! - **row**: raw cells and their normalization into [`MatchRecord`]s
//! - **ratings**: ratings snapshot parsing

pub mod locator;
pub mod ratings;
pub mod row;

use scraper::Html;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{DateRange, MatchHistory, MatchRecord, RatingsSnapshot};
pub use row::{ColumnLayout, RawCell, RawRow};

/// Errors extracting data from a page.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page no longer has the expected structure.
    #[error("Cannot extract data, unexpected page structure: {0}")]
    DocumentShape(String),

    #[error("Cannot extract data, row {row} has an unreadable timestamp '{value}'")]
    RowParse { row: usize, value: String },
}

/// Normalize, order and optionally filter raw match rows.
///
/// A single unreadable timestamp fails the whole build.
pub fn build_history(
    rows: &[RawRow],
    layout: &ColumnLayout,
    range: Option<&DateRange>,
) -> Result<MatchHistory, ExtractError> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| layout.normalize(row, index))
        .collect::<Result<Vec<MatchRecord>, _>>()?;

    let history = MatchHistory::from_records(records);
    let filtered = history.filter_range(range);

    debug!(
        "Built history of {} matches ({} in range)",
        history.len(),
        filtered.len()
    );
    Ok(filtered)
}

/// A parsed player page.
///
/// Holds the DOM, which is not `Send`; build it, extract, and drop it without
/// crossing an `.await`.
pub struct PlayerDocument {
    html: Html,
}

impl PlayerDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Raw rows of the match table, after checking its header is wide enough
    /// for `layout`.
    pub fn match_rows(&self, layout: &ColumnLayout) -> Result<Vec<RawRow>, ExtractError> {
        let table = locator::find_match_table(&self.html).inspect_err(|e| warn!("{}", e))?;

        let headers = locator::header_cells(&table);
        if headers.len() < layout.width() {
            let err = ExtractError::DocumentShape(format!(
                "match table has {} columns, layout needs {}",
                headers.len(),
                layout.width()
            ));
            warn!("{}", err);
            return Err(err);
        }

        Ok(locator::body_rows(&table))
    }

    /// Match history, optionally restricted to `range`.
    pub fn match_history(
        &self,
        layout: &ColumnLayout,
        range: Option<&DateRange>,
    ) -> Result<MatchHistory, ExtractError> {
        let rows = self.match_rows(layout)?;
        build_history(&rows, layout, range)
    }

    /// Current ratings per character.
    pub fn ratings(&self) -> Result<RatingsSnapshot, ExtractError> {
        let table = locator::find_ratings_table(&self.html).inspect_err(|e| warn!("{}", e))?;
        Ok(ratings::parse_ratings_table(&table))
    }
}

#[cfg(test)]
pub(crate) const FIXTURE_PAGE: &str = include_str!("../../tests/fixtures/player_page.html");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurrentRating;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_fixture_history() {
        let doc = PlayerDocument::parse(FIXTURE_PAGE);
        let history = doc.match_history(&ColumnLayout::default(), None).unwrap();

        assert_eq!(history.len(), 5);
        assert!(history.is_sorted());

        let dates: Vec<_> = history.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![d(2023, 12, 31), d(2024, 1, 1), d(2024, 1, 1), d(2024, 1, 1), d(2024, 1, 2)]
        );

        // Short row still produces a record
        let first = &history.records()[0];
        assert_eq!(first.character, "Azucena");
        assert_eq!(first.score, "");
        assert_eq!(first.opponent_char, "");

        let last = &history.records()[4];
        assert_eq!(last.opponent_name, "Rival");
        assert_eq!(last.new_rating, 1512);
        assert_eq!(last.new_opponent_rating, 1480);

        for record in &history {
            assert_eq!(record.new_rating, record.rating + record.rating_change);
            assert_eq!(
                record.new_opponent_rating,
                record.opponent_rating + record.opponent_rating_change
            );
        }
    }

    #[test]
    fn test_fixture_history_in_range() {
        let doc = PlayerDocument::parse(FIXTURE_PAGE);
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 1)).unwrap();
        let history = doc
            .match_history(&ColumnLayout::default(), Some(&range))
            .unwrap();

        assert_eq!(history.len(), 3);
        assert_eq!(history.characters().len(), 2);
    }

    #[test]
    fn test_fixture_ratings() {
        let doc = PlayerDocument::parse(FIXTURE_PAGE);
        let ratings = doc.ratings().unwrap();

        assert_eq!(ratings.get("Azucena"), CurrentRating::Known(1512));
        assert_eq!(ratings.get("Reina"), CurrentRating::Known(1405));
        assert_eq!(ratings.get("Kazuya"), CurrentRating::Unknown);
    }

    #[test]
    fn test_missing_match_table() {
        let doc = PlayerDocument::parse("<html><body><p>Player not found</p></body></html>");
        let err = doc.match_history(&ColumnLayout::default(), None).unwrap_err();
        assert!(matches!(err, ExtractError::DocumentShape(_)));
        assert!(matches!(doc.ratings(), Err(ExtractError::DocumentShape(_))));
    }

    #[test]
    fn test_empty_match_table_is_empty_history() {
        let doc = PlayerDocument::parse(
            "<table><tr><th>When</th><th>1</th><th>2</th><th>3</th><th>4</th><th>5</th><th>6</th></tr></table>",
        );
        let history = doc.match_history(&ColumnLayout::default(), None).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_narrow_header_is_shape_error() {
        let doc = PlayerDocument::parse(
            "<table><tr><th>When</th><th>Char</th></tr><tr><td>01 Jan 2024 10:00</td><td>Reina</td></tr></table>",
        );
        let err = doc.match_rows(&ColumnLayout::default()).unwrap_err();
        assert!(err.to_string().contains("layout needs 7"));
    }

    #[test]
    fn test_bad_timestamp_aborts_build() {
        let rows = vec![
            RawRow::new(vec![RawCell::new("01 Jan 2024 10:00")]),
            RawRow::new(vec![RawCell::new("2024-01-01T10:00")]),
        ];
        let err = build_history(&rows, &ColumnLayout::default(), None).unwrap_err();
        assert!(matches!(err, ExtractError::RowParse { row: 1, .. }));
    }
}
