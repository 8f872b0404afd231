//! Output slot naming for a run
//!
//! Three slots share the same row format: a partial file updated after every
//! batch, a final file written at successful completion, and an error file
//! written when the run aborts with partial data.

use crate::pair::CurrencyPair;
use std::io;
use std::path::{Path, PathBuf};

/// Resolved output file locations for one download run
#[derive(Debug, Clone)]
pub struct RunPaths {
    root: PathBuf,
    partial: PathBuf,
    completed: PathBuf,
    error: PathBuf,
}

impl RunPaths {
    /// Derive the three slots from the output root and the pair
    ///
    /// # Examples
    ///
    /// ```
    /// use fx_rate_downloader::{output::RunPaths, CurrencyPair};
    ///
    /// let pair = CurrencyPair::parse("aud-try").unwrap();
    /// let paths = RunPaths::new("data", &pair);
    /// assert!(paths.final_file().ends_with("aud_try_exchange_rates.csv"));
    /// assert!(paths.partial().ends_with("aud_try_exchange_rates.partial.csv"));
    /// assert!(paths.error().ends_with("aud_try_exchange_rates.error.csv"));
    /// ```
    pub fn new(root: impl Into<PathBuf>, pair: &CurrencyPair) -> Self {
        let root = root.into();
        let stem = format!("{}_exchange_rates", pair.to_filesystem_safe());
        Self {
            partial: root.join(format!("{stem}.partial.csv")),
            completed: root.join(format!("{stem}.csv")),
            error: root.join(format!("{stem}.error.csv")),
            root,
        }
    }

    /// Create the output root directory if missing
    pub fn ensure_directories(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    /// Checkpoint slot rewritten after every batch
    pub fn partial(&self) -> &Path {
        &self.partial
    }

    /// Final slot written once at successful completion
    pub fn final_file(&self) -> &Path {
        &self.completed
    }

    /// Slot written when the run aborts with partial data
    pub fn error(&self) -> &Path {
        &self.error
    }
}
