//! Rate fetching against the lookup API
//!
//! A [`RateFetcher`] performs exactly one lookup for one date and classifies
//! the result into a [`FetchOutcome`] value. Faults never propagate as
//! errors: the scheduler and the retry policy branch on the outcome kind
//! instead of catching exceptions. [`RetryingFetcher`] wraps any fetcher
//! with bounded retry and credential rotation.

use crate::credentials::Credential;
use crate::pair::CurrencyPair;
use crate::RateRow;
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod http;
pub mod retry;

pub use http::HttpRateFetcher;
pub use retry::RetryingFetcher;

/// Classified result of one work-item attempt
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Both anchor-relative rates were present; the cross rate was computed
    Success {
        /// Day the rate applies to
        date: NaiveDate,
        /// Cross rate quote-per-base
        rate: f64,
    },
    /// The API responded but lacked a requested symbol; terminal, not retried
    RateMissing {
        /// Day the lookup was for
        date: NaiveDate,
    },
    /// Network, status, or payload fault; the caller decides whether to retry
    Transient {
        /// Day the lookup was for
        date: NaiveDate,
        /// Human-readable fault description
        cause: String,
    },
    /// Retries exhausted; the date is permanently dropped from output
    Exhausted {
        /// Day the lookup was for
        date: NaiveDate,
    },
}

impl FetchOutcome {
    /// The date this outcome refers to
    pub fn date(&self) -> NaiveDate {
        match self {
            FetchOutcome::Success { date, .. }
            | FetchOutcome::RateMissing { date }
            | FetchOutcome::Transient { date, .. }
            | FetchOutcome::Exhausted { date } => *date,
        }
    }

    /// Convert a Success outcome into an output row; all other kinds are None
    pub fn into_row(self) -> Option<RateRow> {
        match self {
            FetchOutcome::Success { date, rate } => Some(RateRow { date, rate }),
            _ => None,
        }
    }
}

/// One-shot rate lookup for a single date
#[async_trait]
pub trait RateFetcher: Send + Sync {
    /// Fetch the cross rate of `pair` on `date` using `credential`
    ///
    /// Performs exactly one request. Classified faults are returned as
    /// [`FetchOutcome`] variants, never as errors; retry is the wrapping
    /// policy's concern.
    async fn fetch(
        &self,
        date: NaiveDate,
        pair: &CurrencyPair,
        credential: &Credential,
    ) -> FetchOutcome;
}
