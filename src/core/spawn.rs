//! Runtime-agnostic spawning seam.

use std::future::Future;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn a detached future. It must be driven to completion or dropped;
    /// either way any slot it holds is released.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
