//! Audit sink implementations.
//!
//! Provides a bounded in-memory log of task lifecycle events.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::types::TaskId;

/// Lifecycle step being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Task entered the ready set.
    Submit,
    /// Task took a slot and started.
    Admit,
    /// Task finished successfully.
    Complete,
    /// Task failed, timed out or panicked.
    Fail,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Submit => "submit",
            Self::Admit => "admit",
            Self::Complete => "complete",
            Self::Fail => "fail",
        };
        f.write_str(s)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Run the event belongs to.
    pub run_id: String,
    /// Related task identifier.
    pub task_id: TaskId,
    /// Scheduler name.
    pub scheduler: String,
    /// Action taken.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
///
/// Clones share the same buffer, so a caller can keep one handle and give
/// another to the scheduler.
#[derive(Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Task ids of stored events with the given action, oldest first.
    #[must_use]
    pub fn task_ids(&self, action: AuditAction) -> Vec<TaskId> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.action == action)
            .map(|e| e.task_id)
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    run_id: impl Into<String>,
    task_id: TaskId,
    scheduler: impl Into<String>,
    action: AuditAction,
    payload: Option<String>,
) -> AuditEvent {
    let run_id = run_id.into();
    AuditEvent {
        event_id: format!("{run_id}-{task_id}-{action}"),
        run_id,
        task_id,
        scheduler: scheduler.into(),
        action,
        created_at_ms: now_ms(),
        payload,
    }
}
