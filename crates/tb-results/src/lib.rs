//! tb-results: summary records and the output table they are appended to.

pub mod record;
pub mod table;

pub use record::{SummaryRecord, TITLES, format_duration};
pub use table::{SummaryTable, export_json, sidecar_path, write_sidecar};

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output table {path} has unexpected header (column {column}: expected '{expected}', found '{found}')")]
    HeaderMismatch {
        path: String,
        column: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Summary already exists: {path}")]
    AlreadyExists { path: String },
}
