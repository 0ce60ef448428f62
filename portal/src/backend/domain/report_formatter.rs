//! # Report Formatter
//!
//! Turns lists of domain entities into column-ordered rows and renders those
//! rows as delimited text. Quoting follows RFC 4180 and is delegated to the
//! `csv` crate, so anything written here reads back unchanged with a
//! `csv::Reader` configured with the same delimiter.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::backend::domain::error::{PortalError, PortalResult};

/// An entity that can hand out its fields by column name
pub trait Tabular {
    /// Rendered value of `column`, or `None` if the entity has no such field
    fn field(&self, column: &str) -> Option<String>;
}

/// One record: `(column, value)` pairs in column order
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<(String, String)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn values(&self) -> Vec<String> {
        self.cells.iter().map(|(_, value)| value.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

/// Pull `columns` from each item in iteration order.
///
/// A column the item does not know renders as an empty string.
pub fn to_rows<'a, T, I>(items: I, columns: &[&str]) -> Report
where
    T: Tabular + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let rows = items
        .into_iter()
        .map(|item| Row {
            cells: columns
                .iter()
                .map(|column| (column.to_string(), item.field(column).unwrap_or_default()))
                .collect(),
        })
        .collect();

    Report {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

/// Header row of column names, then one line per row.
pub fn to_delimited_text(report: &Report, delimiter: u8, line_ending: LineEnding) -> PortalResult<String> {
    let terminator = match line_ending {
        LineEnding::Lf => Terminator::Any(b'\n'),
        LineEnding::Crlf => Terminator::CRLF,
    };

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(terminator)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(&report.columns)?;
    for row in &report.rows {
        writer.write_record(row.cells.iter().map(|(_, value)| value.as_str()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PortalError::StorageFailure(format!("Failed to finish CSV output: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| PortalError::StorageFailure(format!("CSV output is not UTF-8: {}", e)))
}

/// Comma-delimited text with the given line ending
pub fn to_csv(report: &Report, line_ending: LineEnding) -> PortalResult<String> {
    to_delimited_text(report, b',', line_ending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::ReaderBuilder;

    struct Person {
        first: &'static str,
        last: &'static str,
    }

    impl Tabular for Person {
        fn field(&self, column: &str) -> Option<String> {
            match column {
                "first" => Some(self.first.to_string()),
                "last" => Some(self.last.to_string()),
                _ => None,
            }
        }
    }

    fn people() -> Vec<Person> {
        vec![
            Person { first: "Alice", last: "Smith, \"Bob\"" },
            Person { first: "Ravi", last: "Kumar" },
            Person { first: "Line\nBreak", last: "" },
        ]
    }

    fn parse(text: &str, delimiter: u8) -> Vec<Vec<String>> {
        ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_reader(text.as_bytes())
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_to_rows_follows_column_order_and_blanks_unknown_fields() {
        let report = to_rows(&people(), &["last", "first", "age"]);
        assert_eq!(report.columns, vec!["last", "first", "age"]);
        assert_eq!(report.len(), 3);
        assert_eq!(report.rows[1].values(), vec!["Kumar", "Ravi", ""]);
        assert_eq!(report.rows[0].get("first"), Some("Alice"));
        assert_eq!(report.rows[0].get("missing"), None);
    }

    #[test]
    fn test_csv_round_trip_reproduces_values() {
        let report = to_rows(&people(), &["first", "last"]);
        let text = to_csv(&report, LineEnding::Lf).unwrap();

        assert!(text.starts_with("first,last\n"));
        assert!(text.contains("\"Smith, \"\"Bob\"\"\""));

        let parsed = parse(&text, b',');
        assert_eq!(parsed[0], vec!["first", "last"]);
        let rows: Vec<Vec<String>> = report.rows.iter().map(Row::values).collect();
        assert_eq!(&parsed[1..], rows.as_slice());
    }

    #[test]
    fn test_crlf_and_custom_delimiter() {
        let report = to_rows(&people()[1..2], &["first", "last"]);
        let text = to_delimited_text(&report, b';', LineEnding::Crlf).unwrap();
        assert_eq!(text, "first;last\r\nRavi;Kumar\r\n");
        assert_eq!(parse(&text, b';')[1], vec!["Ravi", "Kumar"]);
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let report = to_rows(&Vec::<Person>::new(), &["first", "last"]);
        assert!(report.is_empty());
        assert_eq!(to_csv(&report, LineEnding::Lf).unwrap(), "first,last\n");
    }
}
