//! Batched concurrent fetch orchestration
//!
//! The scheduler partitions the work-item sequence into consecutive windows
//! of at most `batch_size` items, runs every item of a window concurrently
//! through the retry-wrapped fetcher, and checkpoints the accumulated
//! results after each window. A crash, worker fault, or shutdown request
//! therefore never loses completed work.
//!
//! # Overview
//!
//! 1. **Partition**: consecutive windows of at most `batch_size` items
//! 2. **Dispatch**: each window's items run concurrently on the runtime
//! 3. **Await**: a window fully resolves before the next one dispatches
//! 4. **Checkpoint**: the full accumulated row set is rewritten atomically
//!    to the partial slot after every window
//! 5. **Finalize**: one last write to the final slot, or to the error slot
//!    when the run aborts
//!
//! # Error Handling
//!
//! Classified fetch faults never surface here - they arrive as
//! [`FetchOutcome`](crate::fetcher::FetchOutcome) values and are either
//! retried by the policy or dropped. Only a worker fault escaping the
//! outcome protocol (a panic) or a persistence failure aborts the run,
//! after a best-effort checkpoint of everything accumulated so far.

use crate::output::OutputError;

pub mod config;
pub mod executor;

pub use executor::BatchScheduler;

/// Scheduler errors
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// A worker task failed outside the classified outcome protocol
    #[error("worker fault: {0}")]
    WorkerFault(String),

    /// The run was aborted by a shutdown request at a window boundary
    #[error("shutdown requested")]
    Shutdown,

    /// Checkpoint persistence failure
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}
