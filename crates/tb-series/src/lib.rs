//! tb-series: bench recording ingestion and normalized time series.
//!
//! A recording is read as a [`RawTable`] (leading block skipped, header row,
//! raw cell text), resolved against the required channels, and built into a
//! [`TimeSeries`] whose elapsed times are re-based to the first sample.
//! Every later query works on read-only [`SeriesView`]s in elapsed-time
//! space.

pub mod columns;
pub mod series;
pub mod table;
pub mod timestamp;

pub use columns::{Channel, ColumnMap};
pub use series::{Sample, SeriesView, TimeSeries, build};
pub use table::{DEFAULT_SKIP_ROWS, RawTable};

pub type SeriesResult<T> = Result<T, SeriesError>;

#[derive(thiserror::Error, Debug)]
pub enum SeriesError {
    #[error("Missing required column: {column}")]
    MissingColumn { column: &'static str },

    #[error("Invalid {column} value '{value}' in data row {row}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Timestamp in data row {row} is earlier than the previous sample")]
    NonMonotonic { row: usize },

    #[error("Recording has no data rows")]
    Empty,

    #[error("Channel lengths differ: {what}")]
    LengthMismatch { what: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SeriesError {
    /// True when the recording was readable but its layout or content is
    /// wrong (as opposed to an I/O failure).
    pub fn is_shape_error(&self) -> bool {
        !matches!(self, SeriesError::Io(_) | SeriesError::Csv(_))
    }
}
