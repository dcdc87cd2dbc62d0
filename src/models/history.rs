//! Ordered match history for one player.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{DateRange, MatchRecord};

/// Timestamp-ordered sequence of matches.
///
/// Ordering is a stable sort on `timestamp`, so matches sharing a timestamp
/// keep their source order. Filtering methods return new histories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchHistory {
    records: Vec<MatchRecord>,
}

impl MatchHistory {
    /// Sort `records` by timestamp (stable) into a history.
    pub fn from_records(mut records: Vec<MatchRecord>) -> Self {
        records.sort_by_key(|r| r.timestamp);
        Self { records }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.records.iter()
    }

    /// Whether timestamps are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.records
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }

    /// Matches whose date falls inside `range`; everything when `None`.
    pub fn filter_range(&self, range: Option<&DateRange>) -> Self {
        match range {
            Some(range) => self.filtered(|r| range.contains(r.date)),
            None => self.clone(),
        }
    }

    /// Matches played with `character`.
    pub fn for_character(&self, character: &str) -> Self {
        self.filtered(|r| r.character == character)
    }

    /// Distinct characters the player used, in name order.
    pub fn characters(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.character.as_str()).collect()
    }

    fn filtered(&self, keep: impl Fn(&MatchRecord) -> bool) -> Self {
        Self {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MatchHistory {
    type Item = &'a MatchRecord;
    type IntoIter = std::slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn record(ts: &str, character: &str, score: &str) -> MatchRecord {
        let ts = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap();
        MatchRecord::new(ts, character).with_score(score, false)
    }

    fn sample() -> MatchHistory {
        MatchHistory::from_records(vec![
            record("2024-01-02 10:00", "Azucena", "a"),
            record("2024-01-01 09:00", "Reina", "b"),
            record("2024-01-02 10:00", "Azucena", "c"),
            record("2024-01-01 08:00", "Azucena", "d"),
        ])
    }

    #[test]
    fn test_from_records_sorts_stably() {
        let history = sample();
        let scores: Vec<_> = history.iter().map(|r| r.score.as_str()).collect();
        assert_eq!(scores, vec!["d", "b", "a", "c"]);
        assert!(history.is_sorted());
    }

    #[test]
    fn test_resort_is_noop() {
        let history = sample();
        let again = MatchHistory::from_records(history.records().to_vec());
        assert_eq!(history, again);
    }

    #[test]
    fn test_filter_range() {
        let history = sample();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let range = DateRange::new(day, day).unwrap();

        let filtered = history.filter_range(Some(&range));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.date == day));

        assert_eq!(history.filter_range(None), history);
    }

    #[test]
    fn test_for_character_and_characters() {
        let history = sample();
        assert_eq!(history.for_character("Azucena").len(), 3);
        assert!(history.for_character("Kazuya").is_empty());

        let chars: Vec<_> = history.characters().into_iter().collect();
        assert_eq!(chars, vec!["Azucena", "Reina"]);
    }
}
