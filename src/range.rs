//! Date range partitioning
//!
//! Expands a start/end date pair into an ordered sequence of per-day work
//! items for the scheduler. The range is half-open at the start: the first
//! produced date is `start + 1 day` and the last is `end` itself.

use crate::pair::CurrencyPair;
use chrono::NaiveDate;

/// A single calendar date for which a rate must be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// The day the rate applies to
    pub date: NaiveDate,
    /// The pair being downloaded
    pub pair: CurrencyPair,
}

/// Lazy iterator over the work items of a date range
///
/// Produces every date in `(start, end]` in strictly increasing one-day
/// strides. The iterator is `Clone`, so a range can be restarted.
///
/// # Examples
///
/// ```
/// use fx_rate_downloader::{CurrencyPair, DateRange};
/// use chrono::NaiveDate;
///
/// let pair = CurrencyPair::parse("eur-usd").unwrap();
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
///     pair,
/// )
/// .unwrap();
/// let dates: Vec<_> = range.map(|item| item.date.to_string()).collect();
/// assert_eq!(dates, ["2024-01-02", "2024-01-03", "2024-01-04"]);
/// ```
#[derive(Debug, Clone)]
pub struct DateRange {
    next: NaiveDate,
    end: NaiveDate,
    pair: CurrencyPair,
}

impl DateRange {
    /// Create a partitioner over `(start, end]`
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidRange`] unless `start` is strictly
    /// before `end`.
    pub fn new(start: NaiveDate, end: NaiveDate, pair: CurrencyPair) -> Result<Self, RangeError> {
        if start >= end {
            return Err(RangeError::InvalidRange { start, end });
        }
        // start itself is never emitted; succ cannot overflow here since
        // start < end holds
        let next = start.succ_opt().ok_or(RangeError::InvalidRange { start, end })?;
        Ok(Self { next, end, pair })
    }

    /// Number of work items remaining
    pub fn remaining(&self) -> usize {
        if self.next > self.end {
            0
        } else {
            (self.end - self.next).num_days() as usize + 1
        }
    }
}

impl Iterator for DateRange {
    type Item = WorkItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let date = self.next;
        self.next = date.succ_opt()?;
        Some(WorkItem {
            date,
            pair: self.pair.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}

/// Errors that can occur during range construction
#[derive(Debug, thiserror::Error)]
pub enum RangeError {
    /// Start date is not strictly before the end date
    #[error("range error: start date {start} must be strictly before end date {end}")]
    InvalidRange {
        /// Requested start of the range (excluded from output)
        start: NaiveDate,
        /// Requested end of the range (included in output)
        end: NaiveDate,
    },
}
