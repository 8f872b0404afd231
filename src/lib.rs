//! # FX Rate Downloader Library
//!
//! A fault-tolerant downloader for daily currency exchange rates. Given a
//! currency pair and a date range, it fetches one cross rate per calendar day
//! from a rate-lookup API, rotating among multiple API credentials on
//! transient failures, and checkpoints partial progress to CSV after every
//! batch so an interrupted run never loses completed work.
//!
//! ## Features
//!
//! - **Batched Concurrency**: Work items are dispatched in bounded windows;
//!   a whole window resolves before the next one starts
//! - **Credential Rotation**: Transient failures rotate to the next API key
//!   and retry up to a configurable bound
//! - **Incremental Checkpointing**: The accumulated result set is rewritten
//!   atomically after every window, with distinct partial/final/error slots
//! - **Classified Outcomes**: Fetch faults are values, not exceptions, so the
//!   retry policy is testable without real network failures
//!
//! ## Quick Start
//!
//! ```no_run
//! use fx_rate_downloader::{
//!     BatchScheduler, CredentialRotator, CurrencyPair, DateRange,
//!     fetcher::{HttpRateFetcher, RetryingFetcher},
//!     output::RunPaths,
//! };
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pair = CurrencyPair::parse("eur-usd")?;
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
//!     pair.clone(),
//! )?;
//!
//! let rotator = CredentialRotator::shared(vec!["key-a".into(), "key-b".into()])?;
//! let fetcher = Arc::new(RetryingFetcher::new(Arc::new(HttpRateFetcher::new()), rotator));
//!
//! let paths = RunPaths::new("./data", &pair);
//! let rows = BatchScheduler::new(fetcher, paths)
//!     .run(range.collect())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`pair`] - Currency pair parsing and validation (BASE-QUOTE)
//! - [`range`] - Date range partitioning into per-day work items
//! - [`credentials`] - Shared credential rotation across fetch workers
//! - [`fetcher`] - Rate lookup, outcome classification, and retry policy
//! - [`scheduler`] - Windowed concurrent execution with per-batch checkpoints
//! - [`output`] - Atomic CSV checkpoint writing and output slot naming
//! - [`config`] - Environment-based credential and endpoint configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// CLI command implementation
pub mod cli;

/// Environment configuration
pub mod config;

/// Credential rotation
pub mod credentials;

/// Rate fetching and retry policy
pub mod fetcher;

/// Result sink and output slot naming
pub mod output;

/// Currency pair parsing and validation
pub mod pair;

/// Date range partitioning
pub mod range;

/// Batched concurrent fetch orchestration
pub mod scheduler;

/// Graceful shutdown coordination shared across modules
pub mod shutdown;

// Re-export commonly used types
pub use credentials::{Credential, CredentialRotator};
pub use fetcher::{FetchOutcome, RateFetcher};
pub use pair::CurrencyPair;
pub use range::{DateRange, WorkItem};
pub use scheduler::BatchScheduler;

/// One fetched exchange rate destined for output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    /// Calendar day the rate applies to (UTC, no time component)
    pub date: NaiveDate,
    /// Cross rate quote-per-base for that day
    pub rate: f64,
}

impl RateRow {
    /// Validate row integrity
    pub fn validate(&self) -> Result<(), String> {
        if !self.rate.is_finite() {
            return Err(format!("Rate must be finite, got {}", self.rate));
        }
        if self.rate <= 0.0 {
            return Err(format!("Rate must be positive, got {}", self.rate));
        }
        Ok(())
    }
}
