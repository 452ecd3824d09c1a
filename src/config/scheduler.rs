//! Scheduler configuration structures.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Environment variable holding the concurrency cap.
pub const ENV_MAX_CONCURRENCY: &str = "ADMISSION_MAX_CONCURRENCY";
/// Environment variable holding the per-task timeout in milliseconds.
pub const ENV_TASK_TIMEOUT_MS: &str = "ADMISSION_TASK_TIMEOUT_MS";
/// Environment variable holding the scheduler name.
pub const ENV_NAME: &str = "ADMISSION_NAME";

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Name attached to logs and audit events.
    pub name: String,
    /// Maximum number of units running at once. Must be at least 1.
    pub max_concurrency: u32,
    /// Optional per-task timeout in milliseconds.
    pub task_timeout_ms: Option<u64>,
    /// Events retained by the in-memory audit sink.
    pub audit_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            name: "default".into(),
            max_concurrency: u32::try_from(num_cpus::get()).unwrap_or(u32::MAX),
            task_timeout_ms: None,
            audit_capacity: 1024,
        }
    }
}

impl SchedulerConfig {
    /// Defaults: one slot per CPU, no timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scheduler name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the concurrency cap.
    #[must_use]
    pub const fn with_max_concurrency(mut self, max_concurrency: u32) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Set the per-task timeout.
    #[must_use]
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Set the audit buffer size.
    #[must_use]
    pub const fn with_audit_capacity(mut self, audit_capacity: usize) -> Self {
        self.audit_capacity = audit_capacity;
        self
    }

    /// Per-task timeout as a `Duration`.
    #[must_use]
    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_ms.map(Duration::from_millis)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// A description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".into());
        }
        if self.task_timeout_ms == Some(0) {
            return Err("task_timeout_ms must be greater than 0 when set".into());
        }
        if self.audit_capacity == 0 {
            return Err("audit_capacity must be greater than 0".into());
        }
        if self.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Parse failures and validation failures, as strings.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading a `.env`
    /// file first if one exists. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Unparseable values or a configuration that fails validation.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (environment-shaped).
    ///
    /// # Errors
    ///
    /// Unparseable values or a configuration that fails validation.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(name) = lookup(ENV_NAME) {
            cfg.name = name;
        }
        if let Some(raw) = lookup(ENV_MAX_CONCURRENCY) {
            cfg.max_concurrency = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_CONCURRENCY}={raw:?} is not a valid u32"))?;
        }
        if let Some(raw) = lookup(ENV_TASK_TIMEOUT_MS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TASK_TIMEOUT_MS}={raw:?} is not a valid u64"))?;
            cfg.task_timeout_ms = Some(ms);
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
