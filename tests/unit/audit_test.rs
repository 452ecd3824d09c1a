//! Tests for audit sinks

use prometheus_admission::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};

#[test]
fn test_build_audit_event() {
    let event = build_audit_event("run-1", 7, "batch", AuditAction::Admit, None);
    assert_eq!(event.event_id, "run-1-7-admit");
    assert_eq!(event.run_id, "run-1");
    assert_eq!(event.task_id, 7);
    assert_eq!(event.scheduler, "batch");
    assert_eq!(event.action, AuditAction::Admit);
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_in_memory_sink_is_bounded() {
    let mut sink = InMemoryAuditSink::new(2);
    for id in 0..3 {
        sink.record(build_audit_event("r", id, "s", AuditAction::Submit, None));
    }
    assert_eq!(sink.task_ids(AuditAction::Submit), vec![1, 2]);
}

#[test]
fn test_clones_share_buffer() {
    let reader = InMemoryAuditSink::new(8);
    let mut writer = reader.clone();
    writer.record(build_audit_event(
        "r",
        1,
        "s",
        AuditAction::Fail,
        Some("workload failed: io".into()),
    ));
    let events = reader.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].payload.as_deref(), Some("workload failed: io"));
    assert!(reader.task_ids(AuditAction::Complete).is_empty());
}

#[test]
fn test_action_serializes_snake_case() {
    let json = serde_json::to_string(&AuditAction::Complete).unwrap();
    assert_eq!(json, "\"complete\"");
    assert_eq!(AuditAction::Fail.to_string(), "fail");
}
