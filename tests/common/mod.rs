//! Shared test doubles for the scheduler integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use fx_rate_downloader::credentials::Credential;
use fx_rate_downloader::fetcher::{FetchOutcome, RateFetcher};
use fx_rate_downloader::output::{CsvRateSink, OutputResult, RateSink};
use fx_rate_downloader::pair::CurrencyPair;
use fx_rate_downloader::RateRow;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn pair(s: &str) -> CurrencyPair {
    CurrencyPair::parse(s).unwrap()
}

/// Fetcher driven by a per-date outcome script.
///
/// Scripted outcomes are consumed front to back; once a date's queue is
/// empty (or was never scripted) the fetch succeeds with the configured
/// rate for that date, falling back to 1.0.
pub struct ScriptedFetcher {
    outcomes: Mutex<HashMap<NaiveDate, VecDeque<FetchOutcome>>>,
    rates: HashMap<NaiveDate, f64>,
    calls: Mutex<Vec<NaiveDate>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            rates: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rate(mut self, date: NaiveDate, rate: f64) -> Self {
        self.rates.insert(date, rate);
        self
    }

    pub fn with_outcomes(self, date: NaiveDate, scripted: Vec<FetchOutcome>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(date, scripted.into_iter().collect());
        self
    }

    /// Number of fetch attempts observed for `date`
    pub fn calls_for(&self, date: NaiveDate) -> usize {
        self.calls.lock().unwrap().iter().filter(|d| **d == date).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RateFetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        date: NaiveDate,
        _pair: &CurrencyPair,
        _credential: &Credential,
    ) -> FetchOutcome {
        self.calls.lock().unwrap().push(date);

        if let Some(queue) = self.outcomes.lock().unwrap().get_mut(&date) {
            if let Some(outcome) = queue.pop_front() {
                return outcome;
            }
        }

        let rate = self.rates.get(&date).copied().unwrap_or(1.0);
        FetchOutcome::Success { date, rate }
    }
}

/// Fetcher that panics for one configured date, succeeding otherwise.
pub struct PanickingFetcher {
    pub panic_on: NaiveDate,
}

#[async_trait]
impl RateFetcher for PanickingFetcher {
    async fn fetch(
        &self,
        date: NaiveDate,
        _pair: &CurrencyPair,
        _credential: &Credential,
    ) -> FetchOutcome {
        if date == self.panic_on {
            panic!("injected worker fault for {date}");
        }
        FetchOutcome::Success { date, rate: 1.0 }
    }
}

/// Fetcher that delays each date by a configured duration before succeeding,
/// so completion order within a window differs from dispatch order.
pub struct DelayedFetcher {
    pub delays: HashMap<NaiveDate, Duration>,
    pub rates: HashMap<NaiveDate, f64>,
}

#[async_trait]
impl RateFetcher for DelayedFetcher {
    async fn fetch(
        &self,
        date: NaiveDate,
        _pair: &CurrencyPair,
        _credential: &Credential,
    ) -> FetchOutcome {
        if let Some(delay) = self.delays.get(&date) {
            tokio::time::sleep(*delay).await;
        }
        let rate = self.rates.get(&date).copied().unwrap_or(1.0);
        FetchOutcome::Success { date, rate }
    }
}

/// One observed persist call: destination and row count.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteEvent {
    pub destination: PathBuf,
    pub rows: usize,
}

/// Sink that records every persist call and delegates to the real CSV sink.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub writes: Arc<Mutex<Vec<WriteEvent>>>,
    inner: CsvRateSink,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row counts of the writes that targeted `destination`
    pub fn row_counts_for(&self, destination: &Path) -> Vec<usize> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.destination == destination)
            .map(|event| event.rows)
            .collect()
    }
}

impl RateSink for RecordingSink {
    fn persist(&self, rows: &[RateRow], destination: &Path) -> OutputResult<()> {
        self.writes.lock().unwrap().push(WriteEvent {
            destination: destination.to_path_buf(),
            rows: rows.len(),
        });
        self.inner.persist(rows, destination)
    }
}
