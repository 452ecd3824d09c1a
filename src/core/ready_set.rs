//! Ready set of tasks waiting for admission.
//!
//! A binary heap keyed by `(priority, submission sequence)`. The sequence
//! number is assigned on [`ReadySet::push`], so ties between equal
//! priorities always resolve to the earlier submission.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{ScheduledTask, SchedulerError};
use crate::util::types::{Priority, SubmissionSeq};

/// Heap entry ordered so the max-heap yields the lowest `(priority, seq)`.
struct ReadyEntry<P> {
    priority: Priority,
    seq: SubmissionSeq,
    task: ScheduledTask<P>,
}

impl<P> PartialEq for ReadyEntry<P> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<P> Eq for ReadyEntry<P> {}

impl<P> PartialOrd for ReadyEntry<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for ReadyEntry<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for max-heap: lower rank wins, then earlier submission.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Tasks not yet admitted, ordered by priority then submission order.
///
/// Owned by the scheduler driver; not shared between threads.
pub struct ReadySet<P> {
    heap: BinaryHeap<ReadyEntry<P>>,
    next_seq: SubmissionSeq,
}

impl<P> ReadySet<P> {
    /// Create an empty ready set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty ready set with room for `capacity` tasks.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    /// Insert a task in O(log n) and return its submission sequence number.
    pub fn push(&mut self, task: ScheduledTask<P>) -> SubmissionSeq {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ReadyEntry {
            priority: task.meta.priority,
            seq,
            task,
        });
        seq
    }

    /// Remove and return the task with the lowest priority value, earliest
    /// submission first among equals.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::EmptyReadySet`] if nothing is waiting. Callers are
    /// expected to check [`ReadySet::is_empty`] first; reaching this error is
    /// a driver bug.
    pub fn pop_highest(&mut self) -> Result<ScheduledTask<P>, SchedulerError> {
        self.heap
            .pop()
            .map(|entry| entry.task)
            .ok_or(SchedulerError::EmptyReadySet)
    }

    /// Priority of the task [`ReadySet::pop_highest`] would return next.
    #[must_use]
    pub fn peek_priority(&self) -> Option<Priority> {
        self.heap.peek().map(|entry| entry.priority)
    }

    /// True when no task is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of waiting tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl<P> Default for ReadySet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Extend<ScheduledTask<P>> for ReadySet<P> {
    fn extend<I: IntoIterator<Item = ScheduledTask<P>>>(&mut self, iter: I) {
        for task in iter {
            self.push(task);
        }
    }
}

impl<P> FromIterator<ScheduledTask<P>> for ReadySet<P> {
    fn from_iter<I: IntoIterator<Item = ScheduledTask<P>>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: u64, priority: i64) -> ScheduledTask<String> {
        ScheduledTask::new(id, format!("task-{id}"), priority, format!("payload-{id}"))
    }

    fn drain(set: &mut ReadySet<String>) -> Vec<u64> {
        let mut ids = Vec::new();
        while !set.is_empty() {
            ids.push(set.pop_highest().unwrap().meta.id);
        }
        ids
    }

    #[test]
    fn test_priority_ordering() {
        let mut set = ReadySet::new();
        set.push(make_task(1, 4));
        set.push(make_task(2, 1));
        set.push(make_task(3, 3));
        set.push(make_task(4, 2));

        assert_eq!(drain(&mut set), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_fifo_within_priority() {
        let mut set = ReadySet::new();
        set.push(make_task(10, 3));
        set.push(make_task(11, 3));
        set.push(make_task(12, 3));
        set.push(make_task(13, 1));

        assert_eq!(drain(&mut set), vec![13, 10, 11, 12]);
    }

    #[test]
    fn test_motivating_priorities_admit_in_submission_order() {
        let mut set: ReadySet<String> = [1, 2, 3, 3, 4]
            .iter()
            .zip(1..)
            .map(|(&prio, id)| make_task(id, prio))
            .collect();
        assert_eq!(drain(&mut set), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sequence_assigned_at_push() {
        let mut set = ReadySet::new();
        assert_eq!(set.push(make_task(1, 5)), 0);
        assert_eq!(set.push(make_task(2, 5)), 1);
        set.pop_highest().unwrap();
        // Sequence keeps growing after pops, so later pushes stay behind equals.
        assert_eq!(set.push(make_task(3, 5)), 2);
        assert_eq!(drain(&mut set), vec![2, 3]);
    }

    #[test]
    fn test_negative_priorities_served_first() {
        let mut set = ReadySet::new();
        set.push(make_task(1, 0));
        set.push(make_task(2, -10));
        assert_eq!(set.peek_priority(), Some(Priority(-10)));
        assert_eq!(drain(&mut set), vec![2, 1]);
    }

    #[test]
    fn test_pop_empty_is_error() {
        let mut set = ReadySet::<String>::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(matches!(set.pop_highest(), Err(SchedulerError::EmptyReadySet)));
    }
}
