//! CLI command implementation

use crate::config::{self, ConfigError};
use crate::credentials::{CredentialError, CredentialRotator};
use crate::fetcher::{HttpRateFetcher, RetryingFetcher};
use crate::output::RunPaths;
use crate::pair::{CurrencyPair, PairError};
use crate::range::{DateRange, RangeError, WorkItem};
use crate::scheduler::config::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_RETRIES, MAX_BATCH_SIZE};
use crate::scheduler::{BatchScheduler, SchedulerError};
use crate::shutdown::SharedShutdown;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Parse and validate the batch size value
fn parse_batch_size(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("batch size must be at least 1".to_string());
    }
    if value > MAX_BATCH_SIZE {
        return Err(format!(
            "batch size {value} exceeds maximum of {MAX_BATCH_SIZE}"
        ));
    }
    Ok(value)
}

/// Parse a date argument in YYYY-MM-DD format
fn parse_date(input: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| CliError::InvalidArgument(format!("Invalid date '{input}': {e}")))
}

/// FX Rate Downloader CLI
#[derive(Parser, Debug)]
#[command(name = "fx-rate-downloader")]
#[command(about = "Download daily currency exchange rates over a date range", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Currency pair as BASE-QUOTE
    #[arg(long, default_value = "aud-try")]
    pub pair: String,

    /// First date of the range; rates start the day after
    #[arg(long, default_value = "2024-02-13")]
    pub start_date: String,

    /// Last date of the range, inclusive (default: today, UTC)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Work items fetched concurrently per window (1-32)
    ///
    /// Each window fully resolves - including exhausted retries - before
    /// the next one is dispatched, and a checkpoint is written in between.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, value_parser = parse_batch_size)]
    pub batch_size: usize,

    /// Retries per date after the initial attempt (each one rotates the key)
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES, value_parser = clap::value_parser!(u32).range(0..=20))]
    pub max_retries: u32,

    /// Directory for output files
    #[arg(long, default_value = "data")]
    pub output_dir: PathBuf,
}

impl Cli {
    /// Execute the download run
    pub async fn execute(&self, shutdown: SharedShutdown) -> Result<(), CliError> {
        let pair = CurrencyPair::parse(&self.pair)?;
        let start = parse_date(&self.start_date)?;
        let end = match &self.end_date {
            Some(input) => parse_date(input)?,
            None => Utc::now().date_naive(),
        };

        let credentials = config::load_credentials()?;
        let rotator = CredentialRotator::shared(credentials)?;

        let range = DateRange::new(start, end, pair.clone())?;
        let items: Vec<WorkItem> = range.collect();

        info!(
            %pair,
            %start,
            %end,
            items = items.len(),
            credentials = rotator.len(),
            batch_size = self.batch_size,
            "starting exchange-rate download"
        );

        let fetcher = Arc::new(HttpRateFetcher::with_base_url(config::api_base_url()));
        let retrying = Arc::new(
            RetryingFetcher::new(fetcher, rotator).with_max_retries(self.max_retries),
        );

        let paths = RunPaths::new(&self.output_dir, &pair);
        paths.ensure_directories().map_err(|e| {
            CliError::InvalidArgument(format!("Failed to create output directory: {e}"))
        })?;

        let scheduler = BatchScheduler::new(retrying, paths.clone())
            .with_batch_size(self.batch_size)
            .with_shutdown(shutdown);

        let progress = ProgressBar::new_spinner().with_style(
            ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message(format!("fetching {} daily rates for {pair}", items.len()));
        progress.enable_steady_tick(Duration::from_millis(120));

        let result = scheduler.run(items).await;
        progress.finish_and_clear();

        let rows = result?;
        info!(
            rows = rows.len(),
            path = %paths.final_file().display(),
            "data saved"
        );
        Ok(())
    }
}

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Pair error
    #[error(transparent)]
    Pair(#[from] PairError),

    /// Range error
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Credential error
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Scheduler error
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
