//! Configuration models for the scheduler.

pub mod scheduler;

pub use scheduler::{SchedulerConfig, ENV_MAX_CONCURRENCY, ENV_NAME, ENV_TASK_TIMEOUT_MS};
