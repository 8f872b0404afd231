//! Result sink and output slot naming
//!
//! The sink rewrites a destination wholesale with a `Date,Rate` header and
//! one row per accumulated result. Writes are atomic from a consumer's
//! perspective: the file is always either the previous checkpoint or the new
//! one, never a torn mix.

use crate::RateRow;
use std::path::Path;

pub mod csv;
pub mod path;

pub use csv::CsvRateSink;
pub use path::RunPaths;

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Checkpoint sink for accumulated rate rows
pub trait RateSink: Send + Sync {
    /// Overwrite `destination` with a header row plus one row per entry
    ///
    /// Rows are written in date order regardless of completion order.
    /// Persisting the same row sequence twice must yield identical files.
    fn persist(&self, rows: &[RateRow], destination: &Path) -> OutputResult<()>;
}
