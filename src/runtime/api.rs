//! Entry points for running a batch of self-contained tasks.

use crate::config::SchedulerConfig;
use crate::core::{ScheduleReport, Scheduler, SchedulerError, Task, WorkloadExecutor};
use crate::runtime::TokioSpawner;

/// Run `tasks` on the current tokio runtime with at most `max_concurrency`
/// running at once.
///
/// # Errors
///
/// [`SchedulerError::InvalidConfig`] if `max_concurrency` is 0 or task ids
/// repeat; [`SchedulerError::Runtime`] outside a tokio runtime; driver
/// invariant failures otherwise. Individual workload failures are recorded
/// in the report.
pub async fn schedule<T>(
    tasks: Vec<Task<T>>,
    max_concurrency: u32,
) -> Result<ScheduleReport<T>, SchedulerError>
where
    T: Send + 'static,
{
    let config = SchedulerConfig::new().with_max_concurrency(max_concurrency);
    schedule_with_config(tasks, config).await
}

/// Like [`schedule`], with full configuration.
///
/// # Errors
///
/// See [`schedule`].
pub async fn schedule_with_config<T>(
    tasks: Vec<Task<T>>,
    config: SchedulerConfig,
) -> Result<ScheduleReport<T>, SchedulerError>
where
    T: Send + 'static,
{
    let scheduler = Scheduler::new(config, WorkloadExecutor, TokioSpawner::current()?)?;
    scheduler.schedule(tasks).await
}

/// Run `tasks` from synchronous code on a dedicated runtime with
/// `worker_threads` threads.
///
/// # Errors
///
/// See [`schedule`]; also [`SchedulerError::Runtime`] if the runtime
/// cannot be built.
pub fn schedule_blocking<T>(
    tasks: Vec<Task<T>>,
    config: SchedulerConfig,
    worker_threads: usize,
) -> Result<ScheduleReport<T>, SchedulerError>
where
    T: Send + 'static,
{
    let spawner = TokioSpawner::with_worker_threads(worker_threads)?;
    let handle = spawner.handle().clone();
    let scheduler = Scheduler::new(config, WorkloadExecutor, spawner)?;
    handle.block_on(scheduler.schedule(tasks))
}
