//! Tests for tokio spawner utilities and batch entry points

use prometheus_admission::config::SchedulerConfig;
use prometheus_admission::core::{Outcome, SchedulerError, Spawn, Task};
use prometheus_admission::runtime::{schedule_blocking, TokioSpawner};
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[test]
fn test_current_outside_runtime_is_error() {
    assert!(matches!(TokioSpawner::current(), Err(SchedulerError::Runtime(_))));
}

#[test]
fn test_schedule_blocking_runs_batch() {
    let tasks = vec![
        Task::from_fn(1, "slow", 1, || async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            Ok("slow")
        }),
        Task::from_fn(2, "fast", 2, || async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok("fast")
        }),
    ];

    let report = schedule_blocking(tasks, SchedulerConfig::new().with_max_concurrency(2), 2).unwrap();

    assert_eq!(report.admission_order, vec![1, 2]);
    assert_eq!(report.completion_log.names(), vec!["fast", "slow"]);
    assert_eq!(report.completion_log.get(1).unwrap().outcome, Outcome::Success("slow"));
    assert!(report.total_elapsed >= Duration::from_millis(40));
}
