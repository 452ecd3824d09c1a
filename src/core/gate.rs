//! Admission gate: a bounded counting resource with RAII slot permits.
//!
//! The slot counter is a lock-free `AtomicU32` reserved with a CAS loop, so
//! no lock is held while a unit runs. Waiters park on a `tokio::sync::Notify`
//! (async) or a `parking_lot::Condvar` (blocking); the wake mutex is only
//! taken for the brief acquire/release transitions.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use crate::core::SchedulerError;

/// Snapshot of gate accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateStats {
    /// Configured number of slots.
    pub capacity: u32,
    /// Slots currently held.
    pub in_use: u32,
    /// Total successful acquisitions.
    pub acquired: u64,
    /// Total releases.
    pub released: u64,
    /// Highest `in_use` ever observed.
    pub peak_in_use: u32,
}

impl GateStats {
    /// True when every acquisition has been matched by exactly one release.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.in_use == 0 && self.acquired == self.released
    }
}

/// Shared state for Condvar-based blocking waiters.
struct WakeState {
    /// Threads currently parked in `acquire_blocking`.
    blocked: usize,
}

struct GateInner {
    capacity: u32,
    in_use: AtomicU32,
    acquired: AtomicU64,
    released: AtomicU64,
    peak_in_use: AtomicU32,
    notify: Notify,
    wake_state: Mutex<WakeState>,
    wake_condvar: Condvar,
}

impl GateInner {
    /// Try to reserve one slot atomically using a CAS loop.
    fn try_reserve(&self) -> bool {
        let mut current = self.in_use.load(Ordering::Acquire);
        loop {
            if current >= self.capacity {
                return false;
            }
            match self.in_use.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.acquired.fetch_add(1, Ordering::Relaxed);
                    self.peak_in_use.fetch_max(current + 1, Ordering::Relaxed);
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    fn release_one(&self) -> Result<(), SchedulerError> {
        self.in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map_err(|_| {
                SchedulerError::Invariant("admission gate released more times than acquired".into())
            })?;
        self.released.fetch_add(1, Ordering::Relaxed);

        // Taking the wake lock orders this release after any waiter that saw
        // the gate full and is about to park.
        let blocked = self.wake_state.lock().blocked;
        if blocked > 0 {
            self.wake_condvar.notify_one();
        }
        self.notify.notify_one();
        Ok(())
    }
}

/// Bounded counting gate limiting how many units run at once.
///
/// Cloning yields another handle to the same gate.
#[derive(Clone)]
pub struct AdmissionGate {
    inner: Arc<GateInner>,
}

impl AdmissionGate {
    /// Create a gate with `capacity` slots.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] if `capacity` is 0, since such a
    /// gate could never admit anything.
    pub fn new(capacity: u32) -> Result<Self, SchedulerError> {
        if capacity == 0 {
            return Err(SchedulerError::InvalidConfig(
                "admission gate capacity must be greater than 0".into(),
            ));
        }
        Ok(Self {
            inner: Arc::new(GateInner {
                capacity,
                in_use: AtomicU32::new(0),
                acquired: AtomicU64::new(0),
                released: AtomicU64::new(0),
                peak_in_use: AtomicU32::new(0),
                notify: Notify::new(),
                wake_state: Mutex::new(WakeState { blocked: 0 }),
                wake_condvar: Condvar::new(),
            }),
        })
    }

    /// Configured number of slots.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.inner.capacity
    }

    /// Slots currently held.
    #[must_use]
    pub fn in_use(&self) -> u32 {
        self.inner.in_use.load(Ordering::Acquire)
    }

    /// Free slots right now.
    #[must_use]
    pub fn available(&self) -> u32 {
        self.inner.capacity.saturating_sub(self.in_use())
    }

    /// Take a slot if one is free, without waiting.
    #[must_use]
    pub fn try_acquire(&self) -> Option<SlotPermit> {
        self.inner.try_reserve().then(|| self.permit())
    }

    /// Wait asynchronously until a slot is free, then take it.
    pub async fn acquire(&self) -> SlotPermit {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before re-checking so a release in between is not lost.
            notified.as_mut().enable();
            if let Some(permit) = self.try_acquire() {
                return permit;
            }
            notified.await;
        }
    }

    /// Block the calling thread until a slot is free, then take it.
    ///
    /// Must not be called from inside an async task.
    #[must_use]
    pub fn acquire_blocking(&self) -> SlotPermit {
        let mut state = self.inner.wake_state.lock();
        loop {
            if let Some(permit) = self.try_acquire() {
                return permit;
            }
            state.blocked += 1;
            self.inner.wake_condvar.wait(&mut state);
            state.blocked -= 1;
        }
    }

    /// Snapshot of the gate's accounting.
    #[must_use]
    pub fn stats(&self) -> GateStats {
        GateStats {
            capacity: self.inner.capacity,
            in_use: self.inner.in_use.load(Ordering::Acquire),
            acquired: self.inner.acquired.load(Ordering::Relaxed),
            released: self.inner.released.load(Ordering::Relaxed),
            peak_in_use: self.inner.peak_in_use.load(Ordering::Relaxed),
        }
    }

    fn permit(&self) -> SlotPermit {
        SlotPermit {
            gate: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for AdmissionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionGate")
            .field("stats", &self.stats())
            .finish()
    }
}

/// One held slot. Dropping it releases the slot exactly once, on every exit
/// path including panics and cancellation.
#[must_use = "dropping a permit releases its slot immediately"]
pub struct SlotPermit {
    gate: Arc<GateInner>,
}

impl SlotPermit {
    /// Release the slot now. Equivalent to dropping the permit.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        if let Err(e) = self.gate.release_one() {
            tracing::error!(error = %e, "slot release failed");
        }
    }
}

impl fmt::Debug for SlotPermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotPermit")
            .field("capacity", &self.gate.capacity)
            .finish()
    }
}
