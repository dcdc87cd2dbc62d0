//! Raw table rows and their normalization into match records.

use chrono::NaiveDateTime;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ExtractError;
use crate::models::MatchRecord;

/// Timestamp format of the "When" column, e.g. `05 Jan 2024 18:30`.
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M";

/// Literal result token marking a win.
const WIN_TOKEN: &str = "WIN";

/// Text content of one table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    /// Whitespace-normalized text of the whole cell
    pub text: String,

    /// Text of the first hyperlink inside the cell
    pub link: Option<String>,

    /// Text of the first nested `<span>` (rating change annotation)
    pub annotation: Option<String>,
}

impl RawCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Read a `<td>`/`<th>` element.
    pub fn from_element(cell: &ElementRef) -> Self {
        let link_sel = Selector::parse("a").unwrap();
        let span_sel = Selector::parse("span").unwrap();

        Self {
            text: element_text(cell),
            link: cell.select(&link_sel).next().map(|a| element_text(&a)),
            annotation: cell.select(&span_sel).next().map(|s| element_text(&s)),
        }
    }
}

/// Concatenated text of an element with whitespace runs collapsed.
///
/// Inline markup does not split words: `Jack-<b>8</b>` reads as `Jack-8`.
pub fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// One body row of the match table, cells in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(cells: Vec<RawCell>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, index: usize) -> Option<&RawCell> {
        self.cells.get(index)
    }
}

/// Column index of each match field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    #[serde(default = "default_timestamp")]
    pub timestamp: usize,
    #[serde(default = "default_character")]
    pub character: usize,
    #[serde(default = "default_score")]
    pub score: usize,
    #[serde(default = "default_rating")]
    pub rating: usize,
    #[serde(default = "default_opponent_name")]
    pub opponent_name: usize,
    #[serde(default = "default_opponent_character")]
    pub opponent_character: usize,
    #[serde(default = "default_opponent_rating")]
    pub opponent_rating: usize,
}

fn default_timestamp() -> usize {
    0
}

fn default_character() -> usize {
    1
}

fn default_score() -> usize {
    2
}

fn default_rating() -> usize {
    3
}

fn default_opponent_name() -> usize {
    4
}

fn default_opponent_character() -> usize {
    5
}

fn default_opponent_rating() -> usize {
    6
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            timestamp: default_timestamp(),
            character: default_character(),
            score: default_score(),
            rating: default_rating(),
            opponent_name: default_opponent_name(),
            opponent_character: default_opponent_character(),
            opponent_rating: default_opponent_rating(),
        }
    }
}

impl ColumnLayout {
    fn indices(&self) -> [(&'static str, usize); 7] {
        [
            ("timestamp", self.timestamp),
            ("character", self.character),
            ("score", self.score),
            ("rating", self.rating),
            ("opponent_name", self.opponent_name),
            ("opponent_character", self.opponent_character),
            ("opponent_rating", self.opponent_rating),
        ]
    }

    /// Number of header cells the match table must have.
    pub fn width(&self) -> usize {
        self.indices().iter().map(|(_, i)| i + 1).max().unwrap_or(0)
    }

    /// Check that no two fields share a column.
    pub fn validate(&self) -> Result<(), String> {
        let indices = self.indices();
        for (pos, (name, index)) in indices.iter().enumerate() {
            if let Some((other, _)) = indices[pos + 1..].iter().find(|(_, i)| i == index) {
                return Err(format!(
                    "columns '{}' and '{}' both map to index {}",
                    name, other, index
                ));
            }
        }
        Ok(())
    }

    /// Normalize one raw row into a match record.
    ///
    /// Missing or malformed cells fall back to field defaults. Only the
    /// timestamp is mandatory; `row_index` is reported when it fails.
    pub fn normalize(&self, row: &RawRow, row_index: usize) -> Result<MatchRecord, ExtractError> {
        let when = row.cell(self.timestamp).map_or("", |c| c.text.as_str());
        let timestamp = NaiveDateTime::parse_from_str(when, TIMESTAMP_FORMAT).map_err(|_| {
            ExtractError::RowParse {
                row: row_index,
                value: when.to_string(),
            }
        })?;

        let (score, is_win) = parse_score(row.cell(self.score));
        let (rating, rating_change) = parse_rating(row.cell(self.rating), row_index);
        let (opponent_rating, opponent_change) =
            parse_rating(row.cell(self.opponent_rating), row_index);

        let opponent_name = row
            .cell(self.opponent_name)
            .and_then(|c| c.link.clone())
            .unwrap_or_default();

        Ok(MatchRecord::new(timestamp, text_of(row.cell(self.character)))
            .with_score(score, is_win)
            .with_rating(rating, rating_change)
            .with_opponent(opponent_name, text_of(row.cell(self.opponent_character)))
            .with_opponent_rating(opponent_rating, opponent_change))
    }
}

fn text_of(cell: Option<&RawCell>) -> String {
    cell.map(|c| c.text.clone()).unwrap_or_default()
}

/// `"3-1 WIN"` -> `("3-1", true)`.
fn parse_score(cell: Option<&RawCell>) -> (String, bool) {
    let Some(cell) = cell else {
        return (String::new(), false);
    };
    let mut tokens = cell.text.split_whitespace();
    let score = tokens.next().unwrap_or_default().to_string();
    let is_win = tokens.next() == Some(WIN_TOKEN);
    (score, is_win)
}

/// `"1500 +12"` with a `+12` annotation -> `(1500, 12)`.
fn parse_rating(cell: Option<&RawCell>, row_index: usize) -> (i32, i32) {
    let Some(cell) = cell else {
        return (0, 0);
    };

    let rating = leading_integer(&cell.text).unwrap_or_else(|| {
        debug!("Row {}: no rating in '{}', defaulting to 0", row_index, cell.text);
        0
    });

    let change = cell
        .annotation
        .as_deref()
        .and_then(|a| a.split_whitespace().next())
        .and_then(parse_signed)
        .unwrap_or(0);

    (rating, change)
}

/// Integer at the start of `text`, ignoring whatever follows it.
///
/// A rating cell reads `1500+12` when the annotation span hugs the number.
pub fn leading_integer(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let digits_start = usize::from(text.starts_with(['-', '+']));
    let end = text[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text.len(), |i| digits_start + i);
    parse_signed(&text[..end])
}

/// Parse an integer that may carry a `+`, a Unicode minus, or parentheses.
pub fn parse_signed(token: &str) -> Option<i32> {
    let token = token
        .trim()
        .trim_matches(|c| c == '(' || c == ')')
        .replace('\u{2212}', "-");
    let token = token.strip_prefix('+').unwrap_or(&token);
    token.parse().ok()
}
