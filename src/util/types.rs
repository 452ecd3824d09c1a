//! Identifier and priority types shared across the scheduler.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Task identifier.
pub type TaskId = u64;

/// Submission sequence number, assigned when a task enters the ready set.
pub type SubmissionSeq = u64;

/// Admission priority. Lower values are admitted first.
///
/// Any `i64` is valid; the ordering is the natural integer ordering, so
/// `Priority(1)` precedes `Priority(2)` and `Priority(-5)` precedes both.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Priority(pub i64);

impl Priority {
    /// Raw rank value.
    #[must_use]
    pub const fn rank(self) -> i64 {
        self.0
    }

    /// True if `self` is served before `other`.
    #[must_use]
    pub fn precedes(self, other: Self) -> bool {
        self < other
    }
}

impl From<i64> for Priority {
    fn from(rank: i64) -> Self {
        Self(rank)
    }
}

impl From<i32> for Priority {
    fn from(rank: i32) -> Self {
        Self(i64::from(rank))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}
