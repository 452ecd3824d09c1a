//! Task descriptors submitted to the scheduler.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::core::executor::{workload, Workload};
use crate::core::WorkloadError;
use crate::util::clock::now_ms;
use crate::util::types::{Priority, TaskId};

/// Metadata describing a submitted task.
///
/// Immutable once the task is handed to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetadata {
    /// Unique task identifier.
    pub id: TaskId,
    /// Human-readable name used in logs and reports.
    pub name: String,
    /// Admission priority; lower values are admitted first.
    pub priority: Priority,
    /// Creation timestamp in milliseconds since epoch.
    pub created_at_ms: u128,
}

impl TaskMetadata {
    /// Build metadata stamped with the current wall-clock time.
    pub fn new(id: TaskId, name: impl Into<String>, priority: impl Into<Priority>) -> Self {
        Self {
            id,
            name: name.into(),
            priority: priority.into(),
            created_at_ms: now_ms(),
        }
    }
}

/// A schedulable task with metadata and payload.
#[derive(Debug, Clone)]
pub struct ScheduledTask<P> {
    /// Metadata driving admission decisions.
    pub meta: TaskMetadata,
    /// Task payload handed to the executor.
    pub payload: P,
}

impl<P> ScheduledTask<P> {
    /// Create a task from its parts.
    pub fn new(id: TaskId, name: impl Into<String>, priority: impl Into<Priority>, payload: P) -> Self {
        Self {
            meta: TaskMetadata::new(id, name, priority),
            payload,
        }
    }

    /// Task identifier.
    pub const fn id(&self) -> TaskId {
        self.meta.id
    }

    /// Admission priority.
    pub const fn priority(&self) -> Priority {
        self.meta.priority
    }
}

/// A task whose payload is its own workload closure.
pub type Task<T> = ScheduledTask<Workload<T>>;

impl<T: Send + 'static> ScheduledTask<Workload<T>> {
    /// Create a task that runs `f` when admitted.
    ///
    /// ```rust,ignore
    /// let task = Task::from_fn(1, "fetch", 2, || async {
    ///     tokio::time::sleep(Duration::from_millis(50)).await;
    ///     Ok::<_, WorkloadError>("done")
    /// });
    /// ```
    pub fn from_fn<F, Fut>(
        id: TaskId,
        name: impl Into<String>,
        priority: impl Into<Priority>,
        f: F,
    ) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, WorkloadError>> + Send + 'static,
    {
        Self::new(id, name, priority, workload(f))
    }
}
