//! Raw tabular recording: header row plus cell text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{SeriesError, SeriesResult};

/// Non-data rows the bench logger writes above the header.
pub const DEFAULT_SKIP_ROWS: usize = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_path<P: AsRef<Path>>(path: P, skip_rows: usize) -> SeriesResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, skip_rows)
    }

    /// Read CSV text, skipping `skip_rows` leading records before the header.
    pub fn from_reader<R: Read>(reader: R, skip_rows: usize) -> SeriesResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = csv_reader.records().skip(skip_rows);
        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Err(SeriesError::Empty),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(columns = headers.len(), rows = rows.len(), "read raw table");
        Ok(Self { headers, rows })
    }

    /// Cell text, empty for short rows.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}
