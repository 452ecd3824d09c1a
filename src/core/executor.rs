//! Task execution traits and closure workloads.

use std::future::Future;

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::{TaskMetadata, WorkloadError};

/// Abstraction for executing a task payload and producing a result.
///
/// The executor is responsible for the actual business logic of running a task.
/// It receives the payload `P` and metadata, then returns either a value `T`
/// or a [`WorkloadError`]. The scheduler never inspects either; a failure is
/// recorded against the task and the run continues.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_admission::core::{TaskExecutor, TaskMetadata, WorkloadError};
///
/// #[derive(Clone)]
/// struct SleepExecutor;
///
/// #[async_trait]
/// impl TaskExecutor<u64, String> for SleepExecutor {
///     async fn execute(&self, millis: u64, meta: TaskMetadata) -> Result<String, WorkloadError> {
///         tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
///         Ok(format!("{} done", meta.name))
///     }
/// }
/// ```
#[async_trait]
pub trait TaskExecutor<P, T>: Send + Sync + Clone + 'static
where
    P: Send + 'static,
    T: Send + 'static,
{
    /// Execute a task payload and return the result.
    ///
    /// # Arguments
    ///
    /// * `payload` - The task payload to execute
    /// * `meta` - Task metadata including ID, name and priority
    ///
    /// # Errors
    ///
    /// Any [`WorkloadError`]; it is isolated to this task.
    async fn execute(&self, payload: P, meta: TaskMetadata) -> Result<T, WorkloadError>;
}

/// An opaque, run-once workload.
pub type Workload<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, WorkloadError>> + Send>;

/// Box a closure returning a future into a [`Workload`].
pub fn workload<T, F, Fut>(f: F) -> Workload<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, WorkloadError>> + Send + 'static,
{
    Box::new(move || Box::pin(f()))
}

/// Executor for tasks that carry their own [`Workload`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkloadExecutor;

#[async_trait]
impl<T> TaskExecutor<Workload<T>, T> for WorkloadExecutor
where
    T: Send + 'static,
{
    async fn execute(&self, payload: Workload<T>, _meta: TaskMetadata) -> Result<T, WorkloadError> {
        payload().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_workload_executor_runs_closure() {
        let work = workload(|| async { Ok::<_, WorkloadError>(21 * 2) });
        let out = WorkloadExecutor
            .execute(work, TaskMetadata::new(1, "answer", 0))
            .await;
        assert_eq!(out, Ok(42));
    }

    #[tokio::test]
    async fn test_workload_executor_passes_failure_through() {
        let work = workload(|| async { Err::<(), _>(WorkloadError::failed("boom")) });
        let out = WorkloadExecutor
            .execute(work, TaskMetadata::new(2, "boom", 0))
            .await;
        assert_eq!(out, Err(WorkloadError::Failed("boom".into())));
    }
}
