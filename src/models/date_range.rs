//! Inclusive calendar date window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building a date range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("Invalid date range: start date given without an end date")]
    MissingEnd,

    #[error("Invalid date range: end date given without a start date")]
    MissingStart,

    #[error("Invalid date range: start {start} is after end {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    BadDate(String),
}

/// Inclusive `[start, end]` window of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build an optional range from optional bounds.
    ///
    /// Both bounds or neither; a single bound is rejected rather than treated
    /// as an open-ended filter.
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<Self>, DateRangeError> {
        match (start, end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            (Some(_), None) => Err(DateRangeError::MissingEnd),
            (None, Some(_)) => Err(DateRangeError::MissingStart),
        }
    }

    /// Same as [`DateRange::from_bounds`] but from `YYYY-MM-DD` strings.
    ///
    /// Empty strings count as absent, which is how HTML forms submit blank
    /// date inputs.
    pub fn parse_bounds(
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Option<Self>, DateRangeError> {
        Self::from_bounds(parse_date(start)?, parse_date(end)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn parse_date(s: Option<&str>) -> Result<Option<NaiveDate>, DateRangeError> {
    let Some(s) = s.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DateRangeError::BadDate(s.to_string()))
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_neither_bound_is_no_range() {
        assert_eq!(DateRange::from_bounds(None, None), Ok(None));
    }

    #[test]
    fn test_single_bound_rejected() {
        assert_eq!(
            DateRange::from_bounds(Some(d(2024, 1, 1)), None),
            Err(DateRangeError::MissingEnd)
        );
        assert_eq!(
            DateRange::from_bounds(None, Some(d(2024, 1, 1))),
            Err(DateRangeError::MissingStart)
        );
    }

    #[test]
    fn test_inverted_rejected() {
        assert!(matches!(
            DateRange::new(d(2024, 2, 1), d(2024, 1, 1)),
            Err(DateRangeError::Inverted { .. })
        ));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
        assert!(range.contains(d(2024, 1, 1)));
        assert!(range.contains(d(2024, 1, 31)));
        assert!(!range.contains(d(2023, 12, 31)));
        assert!(!range.contains(d(2024, 2, 1)));
    }

    #[test]
    fn test_parse_bounds() {
        let range = DateRange::parse_bounds(Some("2024-01-01"), Some("2024-01-05"))
            .unwrap()
            .unwrap();
        assert_eq!(range.start, d(2024, 1, 1));
        assert_eq!(range.end, d(2024, 1, 5));

        assert_eq!(DateRange::parse_bounds(Some(""), Some(" ")), Ok(None));
        assert_eq!(
            DateRange::parse_bounds(Some("2024-01-01"), Some("")),
            Err(DateRangeError::MissingEnd)
        );
        assert!(matches!(
            DateRange::parse_bounds(Some("01/01/2024"), Some("2024-01-05")),
            Err(DateRangeError::BadDate(_))
        ));
    }
}
