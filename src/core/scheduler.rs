//! Scheduler driver: the admission control loop.
//!
//! The driver owns the [`ReadySet`] and an [`AdmissionGate`] sized from
//! configuration. It cycles through three states:
//!
//! - **Admitting**: while tasks wait and slots are free, pop the highest
//!   priority task, take a slot and launch an [`ExecutionUnit`]. Launching
//!   never waits for the unit.
//! - **Waiting**: nothing more can be admitted and units are in flight;
//!   block on the completion channel and append whatever arrives to the
//!   [`CompletionLog`]. The unit has already released its slot.
//! - **Done**: the ready set is empty and nothing is in flight.
//!
//! Priority decides admission only. A long high-priority task admitted
//! alongside a short low-priority one will usually finish after it.

use std::collections::HashSet;
use std::marker::PhantomData;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::gate::AdmissionGate;
use crate::core::ready_set::ReadySet;
use crate::core::record::{CompletionLog, ExecutionRecord, ScheduleReport};
use crate::core::unit::ExecutionUnit;
use crate::core::{ScheduledTask, SchedulerError, Spawn, TaskExecutor};
use crate::util::types::TaskId;

/// Logical state of the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Launching units while slots and tasks remain.
    Admitting,
    /// Blocked on the next completion.
    Waiting,
    /// Ready set empty, nothing in flight.
    Done,
}

impl DriverState {
    /// State to enter after an admission pass.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Invariant`] if tasks are waiting, nothing is in
    /// flight, and yet no slot could be taken.
    pub fn after_admission(ready_empty: bool, in_flight: usize) -> Result<Self, SchedulerError> {
        match (ready_empty, in_flight) {
            (true, 0) => Ok(Self::Done),
            (_, n) if n > 0 => Ok(Self::Waiting),
            _ => Err(SchedulerError::Invariant(
                "tasks waiting with no units in flight but no free slot".into(),
            )),
        }
    }
}

/// Priority-ordered, capacity-bounded scheduler for a batch of tasks.
///
/// `P` is the task payload, `T` the workload's value, `E` the executor that
/// turns one into the other and `S` the runtime spawner units run on.
pub struct Scheduler<P, T, E, S> {
    config: SchedulerConfig,
    executor: E,
    spawner: S,
    audit: Option<Mutex<Box<dyn AuditSink>>>,
    _marker: PhantomData<fn(P) -> T>,
}

impl<P, T, E, S> Scheduler<P, T, E, S> {
    /// Create a scheduler.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] if `config` fails validation,
    /// including `max_concurrency == 0`.
    pub fn new(config: SchedulerConfig, executor: E, spawner: S) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        Ok(Self {
            config,
            executor,
            spawner,
            audit: None,
            _marker: PhantomData,
        })
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Mutex::new(audit));
        self
    }

    /// Active configuration.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn record_audit(&self, run_id: &str, task_id: TaskId, action: AuditAction, payload: Option<String>) {
        if let Some(audit) = &self.audit {
            audit
                .lock()
                .record(build_audit_event(run_id, task_id, &self.config.name, action, payload));
        }
    }
}

impl<P, T, E, S> Scheduler<P, T, E, S>
where
    P: Send + 'static,
    T: Send + 'static,
    E: TaskExecutor<P, T>,
    S: Spawn,
{
    /// Run every task to completion under the configured concurrency cap.
    ///
    /// Returns one [`ExecutionRecord`] per task, in completion order, plus
    /// the admission order and total elapsed time. Workload failures are
    /// recorded, not returned as errors.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::InvalidConfig`] for duplicate task ids, before
    ///   anything is admitted.
    /// - [`SchedulerError::EmptyReadySet`], [`SchedulerError::Invariant`] or
    ///   [`SchedulerError::CompletionChannelClosed`] if internal accounting
    ///   breaks; the run is abandoned.
    pub async fn schedule(
        &self,
        tasks: Vec<ScheduledTask<P>>,
    ) -> Result<ScheduleReport<T>, SchedulerError> {
        let run_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "schedule",
            scheduler = %self.config.name,
            run_id = %run_id,
            tasks = tasks.len(),
            max_concurrency = self.config.max_concurrency,
        );
        let result = self.drive(run_id, tasks).instrument(span).await;
        if let Err(e) = &result {
            error!(error = %e, "scheduler run aborted");
        }
        result
    }

    async fn drive(
        &self,
        run_id: String,
        tasks: Vec<ScheduledTask<P>>,
    ) -> Result<ScheduleReport<T>, SchedulerError> {
        check_unique_ids(&tasks)?;

        let submitted = tasks.len();
        let gate = AdmissionGate::new(self.config.max_concurrency)?;
        let timeout = self.config.task_timeout();

        let mut ready = ReadySet::with_capacity(submitted);
        for task in tasks {
            self.record_audit(&run_id, task.meta.id, AuditAction::Submit, None);
            ready.push(task);
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<ExecutionRecord<T>>();
        // Dropped once the ready set drains, so a vanished unit surfaces as
        // a closed channel instead of a hang.
        let mut tx = Some(tx);

        let epoch = Instant::now();
        let mut in_flight = 0usize;
        let mut admission_order = Vec::with_capacity(submitted);
        let mut log = CompletionLog::with_capacity(submitted);
        let mut state = DriverState::Admitting;

        info!(submitted, "scheduler run started");

        loop {
            debug!(?state, ready = ready.len(), in_flight, "driver state");
            state = match state {
                DriverState::Admitting => {
                    while !ready.is_empty() {
                        let Some(permit) = gate.try_acquire() else {
                            break;
                        };
                        let task = ready.pop_highest()?;
                        let completions = tx.clone().ok_or_else(|| {
                            SchedulerError::Invariant("completion sender dropped while admitting".into())
                        })?;

                        let admission_index = admission_order.len();
                        admission_order.push(task.meta.id);
                        in_flight += 1;

                        info!(
                            task_id = task.meta.id,
                            name = %task.meta.name,
                            priority = %task.meta.priority,
                            admission_index,
                            in_use = gate.in_use(),
                            "task admitted"
                        );
                        self.record_audit(&run_id, task.meta.id, AuditAction::Admit, None);

                        ExecutionUnit::new(
                            task,
                            permit,
                            admission_index,
                            self.executor.clone(),
                            timeout,
                            epoch,
                            completions,
                        )
                        .launch(&self.spawner);
                    }
                    if ready.is_empty() {
                        tx = None;
                    }
                    DriverState::after_admission(ready.is_empty(), in_flight)?
                }
                DriverState::Waiting => {
                    let Some(record) = rx.recv().await else {
                        return Err(SchedulerError::CompletionChannelClosed { in_flight });
                    };
                    in_flight -= 1;
                    self.observe(&run_id, &record);
                    log.push(record);
                    DriverState::Admitting
                }
                DriverState::Done => break,
            };
        }

        let total_elapsed = epoch.elapsed();
        let stats = gate.stats();
        if !stats.is_balanced() || stats.acquired != submitted as u64 || log.len() != submitted {
            return Err(SchedulerError::Invariant(format!(
                "accounting mismatch at done: submitted={submitted} recorded={} gate={stats:?}",
                log.len()
            )));
        }

        info!(
            elapsed_ms = total_elapsed.as_millis(),
            succeeded = log.succeeded(),
            failed = log.failed(),
            peak_in_use = stats.peak_in_use,
            "scheduler run finished"
        );

        Ok(ScheduleReport {
            run_id,
            completion_log: log,
            admission_order,
            total_elapsed,
            gate: stats,
        })
    }

    fn observe(&self, run_id: &str, record: &ExecutionRecord<T>) {
        match record.outcome.error() {
            None => {
                info!(
                    task_id = record.task_id,
                    name = %record.name,
                    run_ms = record.run_time().as_millis(),
                    "task completed"
                );
                self.record_audit(run_id, record.task_id, AuditAction::Complete, None);
            }
            Some(e) => {
                info!(
                    task_id = record.task_id,
                    name = %record.name,
                    error = %e,
                    "task failed"
                );
                self.record_audit(run_id, record.task_id, AuditAction::Fail, Some(e.to_string()));
            }
        }
    }
}

fn check_unique_ids<P>(tasks: &[ScheduledTask<P>]) -> Result<(), SchedulerError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.meta.id) {
            return Err(SchedulerError::InvalidConfig(format!(
                "duplicate task id {}",
                task.meta.id
            )));
        }
    }
    Ok(())
}
