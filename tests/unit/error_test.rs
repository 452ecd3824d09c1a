//! Tests for error types

use prometheus_admission::core::{AppResult, SchedulerError, WorkloadError};
use std::time::Duration;

#[test]
fn test_scheduler_error_display() {
    let err = SchedulerError::InvalidConfig("max_concurrency must be greater than 0".into());
    assert_eq!(
        err.to_string(),
        "invalid configuration: max_concurrency must be greater than 0"
    );

    let err = SchedulerError::CompletionChannelClosed { in_flight: 2 };
    assert_eq!(err.to_string(), "completion channel closed with 2 unit(s) in flight");

    assert_eq!(
        SchedulerError::EmptyReadySet.to_string(),
        "ready set popped while empty"
    );
}

#[test]
fn test_workload_error_display() {
    assert_eq!(WorkloadError::failed("disk full").to_string(), "workload failed: disk full");
    assert_eq!(
        WorkloadError::TimedOut(Duration::from_millis(250)).to_string(),
        "workload timed out after 250ms"
    );
    assert_eq!(
        WorkloadError::Panicked("boom".into()).to_string(),
        "workload panicked: boom"
    );
}

#[test]
fn test_scheduler_error_into_anyhow() {
    fn run() -> AppResult<()> {
        Err(SchedulerError::Invariant("gate unbalanced".into()))?;
        Ok(())
    }
    let err = run().unwrap_err();
    assert!(err.to_string().contains("gate unbalanced"));
    assert!(err.downcast_ref::<SchedulerError>().is_some());
}
