//! Shared progress counters and the dispatcher-owned task cursor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::task::Task;

/// Counters written by every worker and read by the dispatcher.
///
/// Outcome increments happen before the worker's completion token is sent,
/// so the dispatcher sees them when it checks for completion after receiving
/// that token.
#[derive(Debug)]
pub struct ProgressState {
    total: usize,
    completed: AtomicUsize,
    successes: AtomicUsize,
    failures: AtomicUsize,
    skipped: AtomicUsize,
}

impl ProgressState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            successes: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Called by a worker at the top of its loop; returns the new attempt count.
    pub fn begin_attempt(&self) -> usize {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records a successful task; `skipped` marks an already-present file.
    pub fn record_success(&self, skipped: bool) {
        if skipped {
            self.skipped.fetch_add(1, Ordering::Relaxed);
        }
        self.successes.fetch_add(1, Ordering::AcqRel);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::AcqRel);
    }

    /// Adds `n` failures at once (tasks that can no longer be attempted).
    pub(super) fn record_lost(&self, n: usize) {
        self.failures.fetch_add(n, Ordering::AcqRel);
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::Acquire)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Acquire)
    }

    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Tasks with a final outcome (success + failure).
    pub fn resolved(&self) -> usize {
        self.successes() + self.failures()
    }

    pub fn is_done(&self) -> bool {
        self.resolved() >= self.total
    }
}

/// Ordered task list plus the index of the next unclaimed task.
/// Only the dispatcher thread owns and advances it.
#[derive(Debug)]
pub struct TaskCursor {
    tasks: Vec<Arc<Task>>,
    next: usize,
}

impl TaskCursor {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into_iter().map(Arc::new).collect(),
            next: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Claims the next task, or `None` once the list is exhausted.
    pub fn next_task(&mut self) -> Option<Arc<Task>> {
        let task = self.tasks.get(self.next).cloned()?;
        self.next += 1;
        Some(task)
    }
}
