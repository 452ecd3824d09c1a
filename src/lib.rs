//! # Prometheus Admission
//!
//! A priority-ordered, capacity-bounded admission scheduler for batches of
//! independent async workloads.
//!
//! Given a fixed batch of tasks and a cap on how many may run at once, the
//! scheduler decides which waiting task claims each free slot (lowest
//! priority value first, submission order among equals) and reports the
//! order in which tasks actually finished.
//!
//! ## Core Problem Solved
//!
//! - **Bounded concurrency**: never more than `max_concurrency` units run at
//!   once, enforced by an [`AdmissionGate`](core::AdmissionGate)
//! - **Priority admission**: the [`ReadySet`](core::ReadySet) hands out
//!   freed slots by priority; priority never preempts running work
//! - **Completion order**: the driver logs completions as they arrive, so the
//!   log reflects real finish order rather than priority order
//! - **Failure isolation**: a failing, panicking or timed-out workload is
//!   recorded against its task and its slot is still released
//!
//! ## Components
//!
//! | Component | Type |
//! |---|---|
//! | Task descriptor | [`ScheduledTask`](core::ScheduledTask), [`Task`](core::Task) |
//! | Ready set | [`ReadySet`](core::ReadySet) |
//! | Admission gate | [`AdmissionGate`](core::AdmissionGate), [`SlotPermit`](core::SlotPermit) |
//! | Execution unit | [`ExecutionUnit`](core::ExecutionUnit) |
//! | Driver | [`Scheduler`](core::Scheduler) |
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use prometheus_admission::core::{Task, WorkloadError};
//! use prometheus_admission::runtime::schedule;
//!
//! let tasks = vec![
//!     Task::from_fn(1, "urgent", 1, || async {
//!         tokio::time::sleep(Duration::from_secs(1)).await;
//!         Ok::<_, WorkloadError>("urgent done")
//!     }),
//!     Task::from_fn(2, "background", 4, || async {
//!         tokio::time::sleep(Duration::from_secs(5)).await;
//!         Ok("background done")
//!     }),
//! ];
//!
//! let report = schedule(tasks, 2).await?;
//! for record in &report.completion_log {
//!     println!("{} finished at {:?}", record.name, record.finished_at);
//! }
//! println!("total: {:?}", report.total_elapsed);
//! ```
//!
//! For custom payloads implement [`TaskExecutor`](core::TaskExecutor) and
//! build a [`Scheduler`](core::Scheduler) directly, see
//! `tests/admission_scheduler_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: ready set, gate, units and driver.
pub mod core;
/// Configuration models for the scheduler.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters and batch entry points.
pub mod runtime;
/// Shared utilities.
pub mod util;
