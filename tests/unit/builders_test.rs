//! Tests for scheduler builders

use prometheus_admission::builders::{build_audited_scheduler, build_scheduler, SchedulerBuilder};
use prometheus_admission::config::SchedulerConfig;
use prometheus_admission::core::{
    AuditAction, InMemoryAuditSink, SchedulerError, Task, Workload, WorkloadExecutor,
};
use prometheus_admission::runtime::TokioSpawner;
use std::time::Duration;

#[test]
fn test_build_scheduler_rejects_invalid_config() {
    let cfg = SchedulerConfig::new().with_max_concurrency(0);
    let result = build_scheduler::<Workload<()>, (), _, _>(&cfg, WorkloadExecutor, ());
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}

#[test]
fn test_builder_accumulates_config() {
    let builder = SchedulerBuilder::new("reports")
        .max_concurrency(3)
        .task_timeout(Duration::from_secs(2));
    assert_eq!(builder.name(), "reports");
    assert_eq!(builder.config().max_concurrency, 3);
    assert_eq!(builder.config().task_timeout_ms, Some(2000));

    let scheduler = builder
        .build::<Workload<()>, (), _, _>(WorkloadExecutor, ())
        .unwrap();
    assert_eq!(scheduler.config().name, "reports");
}

#[tokio::test]
async fn test_builder_audit_sink_receives_events() {
    let sink = InMemoryAuditSink::new(16);
    let scheduler = SchedulerBuilder::new("audited")
        .max_concurrency(1)
        .audit(Box::new(sink.clone()))
        .build(WorkloadExecutor, TokioSpawner::current().unwrap())
        .unwrap();

    let report = scheduler
        .schedule(vec![
            Task::from_fn(1, "one", 2, || async { Ok(1u8) }),
            Task::from_fn(2, "two", 1, || async { Ok(2u8) }),
        ])
        .await
        .unwrap();

    assert_eq!(report.admission_order, vec![2, 1]);
    assert_eq!(sink.task_ids(AuditAction::Admit), vec![2, 1]);
    assert_eq!(sink.task_ids(AuditAction::Complete), vec![2, 1]);
}

#[tokio::test]
async fn test_build_audited_scheduler_respects_capacity() {
    let cfg = SchedulerConfig::new().with_max_concurrency(2).with_audit_capacity(3);
    let (scheduler, sink) =
        build_audited_scheduler(&cfg, WorkloadExecutor, TokioSpawner::current().unwrap()).unwrap();

    let tasks: Vec<Task<u64>> = (0..4)
        .map(|id| Task::from_fn(id, format!("t{id}"), 0, move || async move { Ok(id) }))
        .collect();
    scheduler.schedule(tasks).await.unwrap();

    // 12 events recorded, only the newest 3 kept.
    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.action != AuditAction::Submit));
    assert_eq!(events[2].action, AuditAction::Complete);
}
