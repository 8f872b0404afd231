//! Window-by-window executor driving the fetch pipeline

use crate::fetcher::{FetchOutcome, RetryingFetcher};
use crate::output::{CsvRateSink, RateSink, RunPaths};
use crate::range::WorkItem;
use crate::scheduler::config::DEFAULT_BATCH_SIZE;
use crate::scheduler::SchedulerError;
use crate::shutdown::{self, SharedShutdown};
use crate::RateRow;
use futures::future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Batch scheduler orchestrating the complete download run
///
/// Dispatches work items window by window, bounded by `batch_size`, and
/// checkpoints the accumulated results after every window. The accumulated
/// row set is touched only between windows, so it needs no synchronization;
/// the credential rotator inside the fetcher is the only state shared by
/// concurrent workers.
pub struct BatchScheduler {
    fetcher: Arc<RetryingFetcher>,
    sink: Box<dyn RateSink>,
    paths: RunPaths,
    batch_size: usize,
    shutdown: Option<SharedShutdown>,
}

impl BatchScheduler {
    /// Create a scheduler with the default batch size and CSV sink
    pub fn new(fetcher: Arc<RetryingFetcher>, paths: RunPaths) -> Self {
        Self {
            fetcher,
            sink: Box::new(CsvRateSink::new()),
            paths,
            batch_size: DEFAULT_BATCH_SIZE,
            shutdown: shutdown::get_global_shutdown(),
        }
    }

    /// Set the window size (also the worker-pool bound)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Replace the checkpoint sink
    pub fn with_sink(mut self, sink: Box<dyn RateSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attach a shared shutdown handle, observed at window boundaries only
    pub fn with_shutdown(mut self, shutdown: SharedShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|s| s.is_shutdown_requested())
            .unwrap_or(false)
    }

    /// Best-effort checkpoint of accumulated rows to the error slot.
    /// A persistence failure here is logged; it must not mask the
    /// original fault.
    fn checkpoint_on_abort(&self, rows: &[RateRow]) {
        if let Err(e) = self.sink.persist(rows, self.paths.error()) {
            error!(error = %e, "failed to checkpoint partial results after abort");
        } else {
            info!(
                rows = rows.len(),
                path = %self.paths.error().display(),
                "partial results checkpointed to error slot"
            );
        }
    }

    /// Run the full work-item sequence to completion
    ///
    /// Returns the accumulated rows, which by then are also persisted to the
    /// final output slot. On abort (worker fault or shutdown request) the
    /// rows accumulated so far are persisted to the error slot and the fault
    /// surfaces as [`SchedulerError`].
    pub async fn run(&self, items: Vec<WorkItem>) -> Result<Vec<RateRow>, SchedulerError> {
        let total_windows = items.len().div_ceil(self.batch_size);
        info!(
            items = items.len(),
            batch_size = self.batch_size,
            total_windows,
            "starting download run"
        );

        let mut rows: Vec<RateRow> = Vec::new();

        for (window_index, window) in items.chunks(self.batch_size).enumerate() {
            if self.shutdown_requested() {
                warn!("shutdown requested - aborting before next window");
                self.checkpoint_on_abort(&rows);
                return Err(SchedulerError::Shutdown);
            }

            debug!(
                window = window_index + 1,
                total_windows,
                size = window.len(),
                "dispatching window"
            );

            // every item of the window runs concurrently; the window size
            // is the worker-pool bound
            let handles: Vec<_> = window
                .iter()
                .map(|item| {
                    let fetcher = Arc::clone(&self.fetcher);
                    let item = item.clone();
                    tokio::spawn(async move { fetcher.fetch(&item).await })
                })
                .collect();

            for joined in future::join_all(handles).await {
                match joined {
                    Ok(outcome) => {
                        if let FetchOutcome::RateMissing { date } = &outcome {
                            debug!(%date, "rate not available, skipping date");
                        }
                        if let Some(row) = outcome.into_row() {
                            rows.push(row);
                        }
                    }
                    Err(join_error) => {
                        error!(error = %join_error, "worker task failed unexpectedly");
                        self.checkpoint_on_abort(&rows);
                        return Err(SchedulerError::WorkerFault(join_error.to_string()));
                    }
                }
            }

            self.sink.persist(&rows, self.paths.partial())?;
            info!(
                window = window_index + 1,
                total_windows,
                rows = rows.len(),
                "window complete, checkpoint written"
            );
        }

        self.sink.persist(&rows, self.paths.final_file())?;
        info!(
            rows = rows.len(),
            path = %self.paths.final_file().display(),
            "download run complete"
        );

        Ok(rows)
    }
}
