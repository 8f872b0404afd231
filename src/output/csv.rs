//! CSV checkpoint writer with atomic replace semantics
//!
//! Each persist writes the full row set to a temp file in the destination
//! directory, fsyncs it, and renames it over the destination. A consumer
//! never observes a half-written checkpoint, even if the process dies right
//! after the call.

use crate::output::{OutputError, OutputResult, RateSink};
use crate::RateRow;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// CSV record for one output row
#[derive(Debug, Serialize)]
struct RateRecord {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Rate")]
    rate: f64,
}

impl From<&RateRow> for RateRecord {
    fn from(row: &RateRow) -> Self {
        Self {
            date: row.date,
            rate: row.rate,
        }
    }
}

/// CSV sink writing `Date,Rate` checkpoints
#[derive(Debug, Default, Clone)]
pub struct CsvRateSink;

impl CsvRateSink {
    /// Create a new CSV sink
    pub fn new() -> Self {
        Self
    }
}

impl RateSink for CsvRateSink {
    fn persist(&self, rows: &[RateRow], destination: &Path) -> OutputResult<()> {
        // date order in every slot, whatever the completion order was
        let mut ordered: Vec<&RateRow> = rows.iter().collect();
        ordered.sort_by_key(|row| row.date);

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {e}")))?;
        }

        let parent_dir = destination.parent().unwrap_or_else(|| Path::new("."));
        let temp_file = tempfile::NamedTempFile::new_in(parent_dir)
            .map_err(|e| OutputError::IoError(format!("Failed to create temp file: {e}")))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp_file.as_file());

        // the header is written explicitly so an empty checkpoint still has one
        writer
            .write_record(["Date", "Rate"])
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {e}")))?;

        for row in &ordered {
            writer
                .serialize(RateRecord::from(*row))
                .map_err(|e| OutputError::CsvError(format!("Failed to write row: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| OutputError::IoError(format!("Failed to flush: {e}")))?;
        drop(writer);

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync temp file: {e}")))?;

        temp_file
            .persist(destination)
            .map_err(|e| OutputError::IoError(format!("Failed to persist temp file: {e}")))?;

        // fsync the parent directory so the rename is durable
        if let Ok(dir) = File::open(parent_dir) {
            let _ = dir.sync_all();
        }

        debug!(
            rows = ordered.len(),
            path = %destination.display(),
            "checkpoint written"
        );

        Ok(())
    }
}
