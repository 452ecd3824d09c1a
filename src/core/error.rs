//! Error types for scheduler operations.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// These abort a run. Failures of individual workloads are never reported
/// through this type; see [`WorkloadError`].
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Configuration rejected before any task was admitted.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The ready set was popped while empty.
    #[error("ready set popped while empty")]
    EmptyReadySet,
    /// Gate or queue accounting no longer adds up.
    #[error("invariant violated: {0}")]
    Invariant(String),
    /// No usable async runtime.
    #[error("runtime error: {0}")]
    Runtime(String),
    /// Every completion sender dropped while units were still in flight.
    #[error("completion channel closed with {in_flight} unit(s) in flight")]
    CompletionChannelClosed {
        /// Units that never reported.
        in_flight: usize,
    },
}

/// Failure of a single task's workload.
///
/// Recorded in the task's [`ExecutionRecord`](crate::core::ExecutionRecord);
/// it does not affect other tasks or the driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkloadError {
    /// The workload returned an error.
    #[error("workload failed: {0}")]
    Failed(String),
    /// The workload exceeded the configured per-task timeout.
    #[error("workload timed out after {0:?}")]
    TimedOut(Duration),
    /// The workload panicked.
    #[error("workload panicked: {0}")]
    Panicked(String),
}

impl WorkloadError {
    /// Convenience constructor for [`WorkloadError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
