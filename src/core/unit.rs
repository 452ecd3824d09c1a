//! Execution unit: runs one admitted task while holding one slot.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::core::gate::SlotPermit;
use crate::core::record::{ExecutionRecord, Outcome};
use crate::core::{ScheduledTask, Spawn, TaskExecutor, WorkloadError};

/// Runtime wrapper for one admitted task.
///
/// Owns the task's [`SlotPermit`]. The permit is dropped before the
/// [`ExecutionRecord`] is sent, so by the time the driver observes a
/// completion the slot is already free. Failures, timeouts and panics all
/// end up as [`Outcome::Failure`]; the workload is never retried.
pub struct ExecutionUnit<P, T, E> {
    task: ScheduledTask<P>,
    permit: SlotPermit,
    admission_index: usize,
    executor: E,
    timeout: Option<Duration>,
    epoch: Instant,
    completions: UnboundedSender<ExecutionRecord<T>>,
}

impl<P, T, E> ExecutionUnit<P, T, E>
where
    P: Send + 'static,
    T: Send + 'static,
    E: TaskExecutor<P, T>,
{
    /// Wrap an admitted task.
    ///
    /// `epoch` is the run's start instant; record times are offsets from it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task: ScheduledTask<P>,
        permit: SlotPermit,
        admission_index: usize,
        executor: E,
        timeout: Option<Duration>,
        epoch: Instant,
        completions: UnboundedSender<ExecutionRecord<T>>,
    ) -> Self {
        Self {
            task,
            permit,
            admission_index,
            executor,
            timeout,
            epoch,
            completions,
        }
    }

    /// Start the unit on `spawner`. Returns immediately.
    pub fn launch<S: Spawn>(self, spawner: &S) {
        spawner.spawn(self.run());
    }

    /// Run the workload to completion and report it.
    pub async fn run(self) {
        let Self {
            task,
            permit,
            admission_index,
            executor,
            timeout,
            epoch,
            completions,
        } = self;
        let ScheduledTask { meta, payload } = task;
        let task_id = meta.id;
        let name = meta.name.clone();
        let priority = meta.priority;

        let started_at = epoch.elapsed();
        debug!(task_id, %name, "unit started");

        let work = AssertUnwindSafe(executor.execute(payload, meta)).catch_unwind();
        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, work).await {
                Ok(caught) => flatten_panic(caught),
                Err(_) => Err(WorkloadError::TimedOut(limit)),
            },
            None => flatten_panic(work.await),
        };
        let finished_at = epoch.elapsed();

        if let Err(e) = &result {
            warn!(task_id, %name, error = %e, "workload failed");
        }

        drop(permit);

        let record = ExecutionRecord {
            task_id,
            name,
            priority,
            admission_index,
            outcome: Outcome::from(result),
            started_at,
            finished_at,
        };
        if completions.send(record).is_err() {
            warn!(task_id, "driver no longer listening; completion dropped");
        }
    }
}

fn flatten_panic<T>(
    caught: Result<Result<T, WorkloadError>, Box<dyn Any + Send>>,
) -> Result<T, WorkloadError> {
    caught.unwrap_or_else(|panic| Err(WorkloadError::Panicked(panic_message(panic.as_ref()))))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
