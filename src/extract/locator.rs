//! Locating the match and ratings tables by structural signature.

use scraper::{ElementRef, Html, Selector};

use super::row::{element_text, RawCell, RawRow};
use super::ExtractError;

/// Header text identifying the match table.
pub const MATCH_TABLE_HEADER: &str = "When";

/// Heading text preceding the ratings table.
pub const RATINGS_HEADING: &str = "Ratings";

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// First table whose header row has a cell reading exactly "When".
pub fn find_match_table(document: &Html) -> Result<ElementRef<'_>, ExtractError> {
    let table_sel = Selector::parse("table").unwrap();

    document
        .select(&table_sel)
        .find(|table| {
            header_cells(table)
                .iter()
                .any(|text| text == MATCH_TABLE_HEADER)
        })
        .ok_or_else(|| {
            ExtractError::DocumentShape(format!(
                "no table with a '{}' header",
                MATCH_TABLE_HEADER
            ))
        })
}

/// First table after a heading reading exactly "Ratings", in document order.
pub fn find_ratings_table(document: &Html) -> Result<ElementRef<'_>, ExtractError> {
    let mut seen_heading = false;

    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let name = element.value().name();

        if !seen_heading {
            seen_heading = HEADINGS.contains(&name) && element_text(&element) == RATINGS_HEADING;
        } else if name == "table" {
            return Ok(element);
        }
    }

    Err(ExtractError::DocumentShape(if seen_heading {
        format!("no table after the '{}' heading", RATINGS_HEADING)
    } else {
        format!("no '{}' heading", RATINGS_HEADING)
    }))
}

/// Texts of the first row that holds `<th>` cells.
pub fn header_cells(table: &ElementRef) -> Vec<String> {
    let row_sel = Selector::parse("tr").unwrap();
    let th_sel = Selector::parse("th").unwrap();

    table
        .select(&row_sel)
        .find(|row| row.select(&th_sel).next().is_some())
        .map(|row| row.select(&th_sel).map(|th| element_text(&th)).collect())
        .unwrap_or_default()
}

/// Rows holding `<td>` cells; header-only rows are skipped.
pub fn body_rows(table: &ElementRef) -> Vec<RawRow> {
    let row_sel = Selector::parse("tr").unwrap();
    let td_sel = Selector::parse("td").unwrap();

    table
        .select(&row_sel)
        .filter_map(|row| {
            let cells: Vec<RawCell> = row
                .select(&td_sel)
                .map(|td| RawCell::from_element(&td))
                .collect();
            (!cells.is_empty()).then(|| RawRow::new(cells))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_match_table_by_header() {
        let html = Html::parse_document(
            r#"<table><tr><th>Name</th></tr><tr><td>x</td></tr></table>
               <table><tr><th> When </th><th>Char</th></tr>
                      <tr><td>01 Jan 2024 10:00</td><td>Reina</td></tr></table>"#,
        );
        let table = find_match_table(&html).unwrap();
        assert_eq!(header_cells(&table), vec!["When", "Char"]);

        let rows = body_rows(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells[1].text, "Reina");
    }

    #[test]
    fn test_match_table_exact_text_only() {
        let html = Html::parse_document(
            "<table><tr><th>When?</th></tr></table><table><tr><th>when</th></tr></table>",
        );
        assert!(matches!(
            find_match_table(&html),
            Err(ExtractError::DocumentShape(_))
        ));
    }

    #[test]
    fn test_find_ratings_table_after_heading() {
        let html = Html::parse_document(
            r#"<table><tr><td>Before</td><td>1</td></tr></table>
               <h2>Ratings</h2>
               <p>intro</p>
               <table><tr><td>Azucena</td><td>1500</td></tr></table>"#,
        );
        let table = find_ratings_table(&html).unwrap();
        let rows = body_rows(&table);
        assert_eq!(rows[0].cells[0].text, "Azucena");
    }

    #[test]
    fn test_ratings_table_missing() {
        let no_heading = Html::parse_document("<table><tr><td>x</td></tr></table>");
        let err = find_ratings_table(&no_heading).unwrap_err();
        assert!(err.to_string().contains("heading"));

        let no_table = Html::parse_document("<table></table><h3>Ratings</h3><p>none</p>");
        let err = find_ratings_table(&no_table).unwrap_err();
        assert!(err.to_string().contains("no table after"));
    }

    #[test]
    fn test_cell_link_and_annotation() {
        let html = Html::parse_document(
            r#"<table><tr><th>When</th></tr>
               <tr><td><a href="/p/1"> Rival </a></td><td>1500<span>+12</span></td></tr></table>"#,
        );
        let table = find_match_table(&html).unwrap();
        let rows = body_rows(&table);
        let cells = &rows[0].cells;

        assert_eq!(cells[0].link.as_deref(), Some("Rival"));
        assert_eq!(cells[1].text, "1500+12");
        assert_eq!(cells[1].annotation.as_deref(), Some("+12"));
        assert_eq!(cells[1].link, None);
    }
}
