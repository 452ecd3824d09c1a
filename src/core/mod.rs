//! Core scheduling abstractions: ready set, admission gate, execution units
//! and the driver that ties them together.

pub mod audit;
pub mod error;
pub mod executor;
pub mod gate;
pub mod ready_set;
pub mod record;
pub mod scheduler;
pub mod spawn;
pub mod task;
pub mod unit;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, SchedulerError, WorkloadError};
pub use executor::{workload, TaskExecutor, Workload, WorkloadExecutor};
pub use gate::{AdmissionGate, GateStats, SlotPermit};
pub use ready_set::ReadySet;
pub use record::{
    CompletionLog, ExecutionRecord, Outcome, ScheduleReport, ScheduleSummary, TaskSummary,
};
pub use scheduler::{DriverState, Scheduler};
pub use spawn::Spawn;
pub use task::{ScheduledTask, Task, TaskMetadata};
pub use unit::ExecutionUnit;
