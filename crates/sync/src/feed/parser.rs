//! Delimited feed parsing.
//!
//! The supplier exports a comma-separated file, header row first. The
//! header mapping is computed once per fetch and reused for every row;
//! unrecognized columns are ignored. A data row with fewer fields than the
//! header is invalid and is surfaced to consumers as a row error - it is
//! skipped and counted, never partially read.

use std::collections::HashMap;

use csv::StringRecord;
use thiserror::Error;

use super::FeedError;

/// Canonical feed columns the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Sku,
    Name,
    Price,
    Description,
    Images,
    Stock,
}

impl Column {
    /// Map a header cell (lower-cased, trimmed) to a canonical column.
    fn from_header(cell: &str) -> Option<Self> {
        match cell.trim().to_lowercase().as_str() {
            "sku" => Some(Self::Sku),
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "description" => Some(Self::Description),
            "images" => Some(Self::Images),
            "stock" => Some(Self::Stock),
            _ => None,
        }
    }

    /// Canonical column name, for schema error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sku => "sku",
            Self::Name => "name",
            Self::Price => "price",
            Self::Description => "description",
            Self::Images => "images",
            Self::Stock => "stock",
        }
    }
}

/// One row failed to parse; the run continues with the next row.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("incomplete row at line {line}: {found} of {expected} columns")]
    Incomplete {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("malformed row at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// A fully fetched and header-mapped feed.
#[derive(Debug)]
pub struct ParsedFeed {
    columns: HashMap<Column, usize>,
    header_len: usize,
    records: Vec<Result<StringRecord, String>>,
}

impl ParsedFeed {
    /// Parse delimited feed text. The first row is the header.
    ///
    /// # Errors
    ///
    /// [`FeedError::Empty`] if the body is blank or the header row is
    /// absent. Individual bad data rows are not errors here; they surface
    /// per-row through [`Self::rows`].
    pub fn parse(text: &str) -> Result<Self, FeedError> {
        let text = text.trim_start_matches('\u{FEFF}');
        if text.trim().is_empty() {
            return Err(FeedError::Empty);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers().map_err(|_| FeedError::Empty)?.clone();
        if headers.iter().all(|cell| cell.trim().is_empty()) {
            return Err(FeedError::Empty);
        }

        let mut columns = HashMap::new();
        for (index, cell) in headers.iter().enumerate() {
            if let Some(column) = Column::from_header(cell) {
                // First occurrence wins on duplicate headers.
                columns.entry(column).or_insert(index);
            }
        }

        let records = reader
            .records()
            .map(|result| result.map_err(|e| e.to_string()))
            .filter(|result| {
                // Drop fully blank lines; they are separators, not data.
                !matches!(result, Ok(record) if record.iter().all(|f| f.trim().is_empty()))
            })
            .collect();

        Ok(Self {
            columns,
            header_len: headers.len(),
            records,
        })
    }

    /// Whether the header mapped this canonical column.
    #[must_use]
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    /// Fail with a schema error unless every required column is mapped.
    ///
    /// # Errors
    ///
    /// [`FeedError::Schema`] naming the missing columns.
    pub fn require_columns(&self, required: &[Column]) -> Result<(), FeedError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|c| !self.has_column(**c))
            .map(|c| c.name().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FeedError::Schema { missing })
        }
    }

    /// Number of data rows (including invalid ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the feed has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate data rows. Line numbers are 1-based file lines (header is
    /// line 1), matching what the supplier sees in their export.
    pub fn rows(&self) -> impl Iterator<Item = Result<FeedRow<'_>, RowError>> {
        self.records.iter().enumerate().map(|(index, result)| {
            let line = index + 2;
            match result {
                Err(message) => Err(RowError::Malformed {
                    line,
                    message: message.clone(),
                }),
                Ok(record) if record.len() < self.header_len => Err(RowError::Incomplete {
                    line,
                    found: record.len(),
                    expected: self.header_len,
                }),
                Ok(record) => Ok(FeedRow {
                    line,
                    record,
                    columns: &self.columns,
                }),
            }
        })
    }
}

/// One valid data row, addressed by canonical column.
#[derive(Debug, Clone, Copy)]
pub struct FeedRow<'a> {
    line: usize,
    record: &'a StringRecord,
    columns: &'a HashMap<Column, usize>,
}

impl FeedRow<'_> {
    /// 1-based file line of this row.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// The trimmed cell under a canonical column, or `None` when the
    /// header did not map it.
    #[must_use]
    pub fn get(&self, column: Column) -> Option<&str> {
        let index = *self.columns.get(&column)?;
        self.record.get(index).map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_mapping_is_case_insensitive_and_ignores_unknown() {
        let feed = ParsedFeed::parse("SKU, Name ,PRICE,warehouse_zone\nA1,Lamp,10,Z3\n").unwrap();
        assert!(feed.has_column(Column::Sku));
        assert!(feed.has_column(Column::Name));
        assert!(feed.has_column(Column::Price));
        assert!(!feed.has_column(Column::Stock));

        let row = feed.rows().next().unwrap().unwrap();
        assert_eq!(row.get(Column::Sku), Some("A1"));
        assert_eq!(row.get(Column::Name), Some("Lamp"));
        assert_eq!(row.get(Column::Stock), None);
    }

    #[test]
    fn short_row_is_an_error_never_partially_read() {
        let feed = ParsedFeed::parse("sku,name,price\nA1,Lamp,10\nB2,Chair\n").unwrap();
        let rows: Vec<_> = feed.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_ok());
        match rows[1].as_ref().unwrap_err() {
            RowError::Incomplete {
                line,
                found,
                expected,
            } => {
                assert_eq!(*line, 3);
                assert_eq!(*found, 2);
                assert_eq!(*expected, 3);
            }
            other => panic!("expected incomplete row, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_and_missing_header_are_empty_feed() {
        assert!(matches!(ParsedFeed::parse(""), Err(FeedError::Empty)));
        assert!(matches!(ParsedFeed::parse("   \n"), Err(FeedError::Empty)));
    }

    #[test]
    fn bom_prefixed_feed_parses_like_a_clean_one() {
        let feed = ParsedFeed::parse("\u{FEFF}sku,stock\nA1,5\n").unwrap();
        assert!(feed.has_column(Column::Sku));
        let row = feed.rows().next().unwrap().unwrap();
        assert_eq!(row.get(Column::Stock), Some("5"));
    }

    #[test]
    fn require_columns_names_what_is_missing() {
        let feed = ParsedFeed::parse("sku,name\nA1,Lamp\n").unwrap();
        let err = feed
            .require_columns(&[Column::Sku, Column::Name, Column::Price])
            .unwrap_err();
        match err {
            FeedError::Schema { missing } => assert_eq!(missing, vec!["price".to_string()]),
            other => panic!("expected schema error, got {other:?}"),
        }
        feed.require_columns(&[Column::Sku, Column::Name]).unwrap();
    }

    #[test]
    fn blank_trailing_lines_are_dropped() {
        let feed = ParsedFeed::parse("sku,stock\nA1,5\n\n").unwrap();
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn duplicate_headers_first_occurrence_wins() {
        let feed = ParsedFeed::parse("sku,sku,stock\nfirst,second,3\n").unwrap();
        let row = feed.rows().next().unwrap().unwrap();
        assert_eq!(row.get(Column::Sku), Some("first"));
    }
}
