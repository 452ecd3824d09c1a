//! Runtime adapters and the batch entry points.

pub mod api;
pub mod tokio_spawner;

pub use api::{schedule, schedule_blocking, schedule_with_config};
pub use tokio_spawner::TokioSpawner;
