//! Tests for configuration validation

use prometheus_admission::config::{
    SchedulerConfig, ENV_MAX_CONCURRENCY, ENV_NAME, ENV_TASK_TIMEOUT_MS,
};
use std::collections::HashMap;
use std::time::Duration;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_are_valid() {
    let cfg = SchedulerConfig::default();
    assert!(cfg.validate().is_ok());
    assert!(cfg.max_concurrency >= 1);
    assert_eq!(cfg.task_timeout(), None);
}

#[test]
fn test_invalid_values_rejected() {
    assert!(SchedulerConfig::new().with_max_concurrency(0).validate().is_err());
    assert!(SchedulerConfig::new().with_audit_capacity(0).validate().is_err());
    assert!(SchedulerConfig::new().with_name("  ").validate().is_err());
    assert!(SchedulerConfig::new()
        .with_task_timeout(Duration::ZERO)
        .validate()
        .is_err());
}

#[test]
fn test_from_json_str() {
    let cfg = SchedulerConfig::from_json_str(
        r#"{"name":"nightly","max_concurrency":3,"task_timeout_ms":1500}"#,
    )
    .unwrap();
    assert_eq!(cfg.name, "nightly");
    assert_eq!(cfg.max_concurrency, 3);
    assert_eq!(cfg.task_timeout(), Some(Duration::from_millis(1500)));
    assert_eq!(cfg.audit_capacity, 1024);

    assert!(SchedulerConfig::from_json_str(r#"{"max_concurrency":0}"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_from_lookup_overrides_defaults() {
    let cfg = SchedulerConfig::from_lookup(lookup(&[
        (ENV_NAME, "env-run"),
        (ENV_MAX_CONCURRENCY, " 4 "),
        (ENV_TASK_TIMEOUT_MS, "200"),
    ]))
    .unwrap();
    assert_eq!(cfg.name, "env-run");
    assert_eq!(cfg.max_concurrency, 4);
    assert_eq!(cfg.task_timeout(), Some(Duration::from_millis(200)));
}

#[test]
fn test_from_lookup_rejects_bad_values() {
    let err = SchedulerConfig::from_lookup(lookup(&[(ENV_MAX_CONCURRENCY, "many")])).unwrap_err();
    assert!(err.to_string().contains(ENV_MAX_CONCURRENCY));

    assert!(SchedulerConfig::from_lookup(lookup(&[(ENV_MAX_CONCURRENCY, "0")])).is_err());
    assert!(SchedulerConfig::from_lookup(lookup(&[(ENV_TASK_TIMEOUT_MS, "-5")])).is_err());
}

#[test]
fn test_from_lookup_empty_keeps_defaults() {
    let cfg = SchedulerConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg, SchedulerConfig::default());
}

#[test]
fn test_from_env_reads_process_environment() {
    std::env::set_var(ENV_NAME, "from-env");
    let cfg = SchedulerConfig::from_env().unwrap();
    std::env::remove_var(ENV_NAME);
    assert_eq!(cfg.name, "from-env");
}
