//! Execution records, the completion log and the final schedule report.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::gate::GateStats;
use crate::core::WorkloadError;
use crate::util::types::{Priority, TaskId};

/// Result of running one workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The workload returned a value.
    Success(T),
    /// The workload failed, timed out or panicked.
    Failure(WorkloadError),
}

impl<T> Outcome<T> {
    /// True for [`Outcome::Success`].
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True for [`Outcome::Failure`].
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The returned value, if any.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            Self::Failure(_) => None,
        }
    }

    /// The failure, if any.
    pub const fn error(&self) -> Option<&WorkloadError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(e) => Some(e),
        }
    }

    /// Convert into a plain `Result`.
    ///
    /// # Errors
    ///
    /// The recorded [`WorkloadError`] for a failed task.
    pub fn into_result(self) -> Result<T, WorkloadError> {
        match self {
            Self::Success(v) => Ok(v),
            Self::Failure(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, WorkloadError>> for Outcome<T> {
    fn from(result: Result<T, WorkloadError>) -> Self {
        match result {
            Ok(v) => Self::Success(v),
            Err(e) => Self::Failure(e),
        }
    }
}

/// What happened to one task.
///
/// Times are offsets from the start of the run.
#[derive(Debug, Clone)]
pub struct ExecutionRecord<T> {
    /// Task identifier.
    pub task_id: TaskId,
    /// Task name.
    pub name: String,
    /// Priority the task was admitted with.
    pub priority: Priority,
    /// Zero-based position in admission order.
    pub admission_index: usize,
    /// Value or failure.
    pub outcome: Outcome<T>,
    /// When the workload started.
    pub started_at: Duration,
    /// When the workload finished.
    pub finished_at: Duration,
}

impl<T> ExecutionRecord<T> {
    /// Time spent inside the workload.
    pub fn run_time(&self) -> Duration {
        self.finished_at.saturating_sub(self.started_at)
    }
}

/// Records in the order the driver observed completions.
#[derive(Debug, Clone)]
pub struct CompletionLog<T> {
    records: Vec<ExecutionRecord<T>>,
}

impl<T> CompletionLog<T> {
    /// Create an empty log.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, record: ExecutionRecord<T>) {
        self.records.push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing completed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in completion order.
    pub fn records(&self) -> &[ExecutionRecord<T>] {
        &self.records
    }

    /// Iterate records in completion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionRecord<T>> {
        self.records.iter()
    }

    /// Task ids in completion order.
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.records.iter().map(|r| r.task_id).collect()
    }

    /// Task names in completion order.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Record for `task_id`, if it completed.
    pub fn get(&self, task_id: TaskId) -> Option<&ExecutionRecord<T>> {
        self.records.iter().find(|r| r.task_id == task_id)
    }

    /// Number of successful tasks.
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_success()).count()
    }

    /// Number of failed tasks.
    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_failure()).count()
    }

    /// Consume the log.
    pub fn into_records(self) -> Vec<ExecutionRecord<T>> {
        self.records
    }
}

impl<T> IntoIterator for CompletionLog<T> {
    type Item = ExecutionRecord<T>;
    type IntoIter = std::vec::IntoIter<ExecutionRecord<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a CompletionLog<T> {
    type Item = &'a ExecutionRecord<T>;
    type IntoIter = std::slice::Iter<'a, ExecutionRecord<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Output of one scheduler run.
#[derive(Debug, Clone)]
pub struct ScheduleReport<T> {
    /// Run identifier, also attached to the run's tracing span.
    pub run_id: String,
    /// Every submitted task, in completion order.
    pub completion_log: CompletionLog<T>,
    /// Task ids in the order they were admitted.
    pub admission_order: Vec<TaskId>,
    /// Wall-clock time from the first admission to DONE.
    pub total_elapsed: Duration,
    /// Gate accounting at DONE.
    pub gate: GateStats,
}

impl<T> ScheduleReport<T> {
    /// Sum of every task's run time; what a serial run would have taken.
    pub fn serial_time(&self) -> Duration {
        self.completion_log.iter().map(ExecutionRecord::run_time).sum()
    }

    /// `serial_time / total_elapsed`, or 1.0 for an instantaneous run.
    pub fn speedup(&self) -> f64 {
        let total = self.total_elapsed.as_secs_f64();
        if total <= f64::EPSILON {
            return 1.0;
        }
        self.serial_time().as_secs_f64() / total
    }

    /// Serializable summary for printing or shipping elsewhere.
    pub fn summary(&self) -> ScheduleSummary {
        let tasks = self
            .completion_log
            .iter()
            .map(|r| TaskSummary {
                task_id: r.task_id,
                name: r.name.clone(),
                priority: r.priority,
                admission_index: r.admission_index,
                outcome: match &r.outcome {
                    Outcome::Success(_) => "success".to_string(),
                    Outcome::Failure(e) => e.to_string(),
                },
                started_ms: duration_ms(r.started_at),
                finished_ms: duration_ms(r.finished_at),
            })
            .collect();
        ScheduleSummary {
            run_id: self.run_id.clone(),
            total_elapsed_ms: duration_ms(self.total_elapsed),
            succeeded: self.completion_log.succeeded(),
            failed: self.completion_log.failed(),
            peak_concurrency: self.gate.peak_in_use,
            tasks,
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Per-task line of a [`ScheduleSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task identifier.
    pub task_id: TaskId,
    /// Task name.
    pub name: String,
    /// Admission priority.
    pub priority: Priority,
    /// Position in admission order.
    pub admission_index: usize,
    /// `"success"` or the failure message.
    pub outcome: String,
    /// Start offset in milliseconds.
    pub started_ms: u64,
    /// Finish offset in milliseconds.
    pub finished_ms: u64,
}

/// Serializable view of a [`ScheduleReport`], tasks in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Run identifier.
    pub run_id: String,
    /// Total elapsed milliseconds.
    pub total_elapsed_ms: u64,
    /// Successful tasks.
    pub succeeded: usize,
    /// Failed tasks.
    pub failed: usize,
    /// Highest number of units that ran at once.
    pub peak_concurrency: u32,
    /// Task lines.
    pub tasks: Vec<TaskSummary>,
}
