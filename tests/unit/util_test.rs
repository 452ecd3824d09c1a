//! Tests for utility functions

use prometheus_admission::util::{now_ms, Priority};

#[test]
fn test_priority_ordering() {
    assert!(Priority(1) < Priority(2));
    assert!(Priority(-5).precedes(Priority(0)));
    assert!(!Priority(3).precedes(Priority(3)));
    assert_eq!(Priority::from(4_i32), Priority(4));
    assert_eq!(Priority(9).rank(), 9);
}

#[test]
fn test_priority_display_and_serde() {
    assert_eq!(Priority(2).to_string(), "p2");
    assert_eq!(serde_json::to_string(&Priority(-1)).unwrap(), "-1");
    let parsed: Priority = serde_json::from_str("12").unwrap();
    assert_eq!(parsed, Priority(12));
}

#[test]
fn test_now_ms_monotonic_enough() {
    let a = now_ms();
    let b = now_ms();
    assert!(b >= a);
}
