//! Builders to construct schedulers from configuration.

use std::time::Duration;

use crate::config::SchedulerConfig;
use crate::core::{AuditSink, InMemoryAuditSink, Scheduler, SchedulerError};

/// Build a scheduler from configuration.
///
/// # Errors
///
/// [`SchedulerError::InvalidConfig`] if the configuration is invalid.
pub fn build_scheduler<P, T, E, S>(
    cfg: &SchedulerConfig,
    executor: E,
    spawner: S,
) -> Result<Scheduler<P, T, E, S>, SchedulerError> {
    Scheduler::new(cfg.clone(), executor, spawner)
}

/// Build a scheduler with an in-memory audit sink sized by
/// `cfg.audit_capacity`. The returned sink shares its buffer with the one
/// attached to the scheduler.
///
/// # Errors
///
/// [`SchedulerError::InvalidConfig`] if the configuration is invalid.
pub fn build_audited_scheduler<P, T, E, S>(
    cfg: &SchedulerConfig,
    executor: E,
    spawner: S,
) -> Result<(Scheduler<P, T, E, S>, InMemoryAuditSink), SchedulerError> {
    let sink = InMemoryAuditSink::new(cfg.audit_capacity);
    let scheduler = build_scheduler(cfg, executor, spawner)?.with_audit(Box::new(sink.clone()));
    Ok((scheduler, sink))
}

/// Fluent builder over [`SchedulerConfig`].
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    audit: Option<Box<dyn AuditSink>>,
}

impl SchedulerBuilder {
    /// Start from defaults with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(SchedulerConfig::new().with_name(name))
    }

    /// Start from an existing configuration.
    #[must_use]
    pub fn from_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            audit: None,
        }
    }

    /// Scheduler name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Configuration so far.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Set the concurrency cap.
    #[must_use]
    pub fn max_concurrency(mut self, max: u32) -> Self {
        self.config = self.config.with_max_concurrency(max);
        self
    }

    /// Set the per-task timeout.
    #[must_use]
    pub fn task_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_task_timeout(timeout);
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn audit(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] if the configuration is invalid.
    pub fn build<P, T, E, S>(self, executor: E, spawner: S) -> Result<Scheduler<P, T, E, S>, SchedulerError> {
        let scheduler = build_scheduler(&self.config, executor, spawner)?;
        Ok(match self.audit {
            Some(sink) => scheduler.with_audit(sink),
            None => scheduler,
        })
    }
}
