//! Concurrent download dispatcher.
//!
//! Spawns a fixed pool of worker threads and hands them tasks one at a time:
//! each worker gets one task at spawn, then answers every finished task with
//! a completion token; the dispatcher replies with the next task or a stop
//! sentinel. The loop ends once every task has a success or failure outcome.
//!
//! Shared counters live in [`ProgressState`] (atomics); the task cursor is
//! owned by the dispatcher thread alone.

mod execute;
mod progress;
mod protocol;
mod state;
mod worker;

pub use execute::{fetch_and_persist, Outcome, TaskError};
pub use progress::{progress_channel, ProgressEvent, ProgressReceiver, ProgressSender};
pub use protocol::{DispatcherEnd, Handoff, Ready, WorkerLink};
pub use state::{ProgressState, TaskCursor};

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::storage::Sink;
use crate::task::Task;
use crate::transport::Transport;

use progress::emit;
use worker::WorkerContext;

/// Default pool size.
pub const DEFAULT_WORKERS: usize = 30;
/// Default delay between worker spawns.
pub const DEFAULT_SPAWN_STAGGER: Duration = Duration::from_millis(50);

/// Pool settings for one run.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Requested pool size; clamped to the number of tasks.
    pub workers: usize,
    /// Pause after each spawn so the pool does not open every connection at
    /// the same instant.
    pub spawn_stagger: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            spawn_stagger: DEFAULT_SPAWN_STAGGER,
        }
    }
}

impl DispatchOptions {
    /// Pool size actually used for `task_count` tasks.
    pub fn effective_workers(&self, task_count: usize) -> usize {
        if task_count == 0 {
            return 0;
        }
        self.workers.clamp(1, task_count)
    }
}

/// Final counts of a run. `successes + failures == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    /// Successes that were already on disk (subset of `successes`).
    pub skipped: usize,
    pub workers: usize,
}

/// Downloads every task with a pool of worker threads and returns the counts.
///
/// Blocks until each task was attempted exactly once. An empty task list
/// returns immediately without spawning anything. Progress events go to
/// `progress_tx` when given.
pub fn dispatch(
    tasks: Vec<Task>,
    options: &DispatchOptions,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn Sink>,
    progress_tx: Option<ProgressSender>,
) -> DispatchSummary {
    let mut cursor = TaskCursor::new(tasks);
    let total = cursor.len();
    if cursor.is_empty() {
        return DispatchSummary::default();
    }

    let pool_size = options.effective_workers(total);
    let state = Arc::new(ProgressState::new(total));
    let mut end = DispatcherEnd::new();
    let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(pool_size);

    for slot in 0..pool_size {
        let Some(link) = end.attach() else { break };
        let worker = link.id();
        let ctx = WorkerContext {
            state: Arc::clone(&state),
            transport: Arc::clone(&transport),
            sink: Arc::clone(&sink),
            progress_tx: progress_tx.clone(),
        };
        let spawn_result = std::thread::Builder::new()
            .name(format!("postdl-w{}", worker))
            .spawn(move || worker::run(link, ctx));
        let handle = match spawn_result {
            Ok(h) => h,
            Err(e) => {
                tracing::error!(worker, "could not spawn worker thread: {}", e);
                break;
            }
        };
        handles.push(handle);
        tracing::debug!(worker, "worker spawned");
        emit(progress_tx.as_ref(), ProgressEvent::WorkerSpawned { worker });

        if let Some(task) = cursor.next_task() {
            if !end.deliver(worker, Handoff::Task(task)) {
                tracing::warn!(worker, "worker exited before its first task");
            }
        }
        if slot + 1 < pool_size && !options.spawn_stagger.is_zero() {
            std::thread::sleep(options.spawn_stagger);
        }
    }
    end.close_spawning();

    loop {
        let Some(Ready { worker }) = end.wait_ready() else {
            // Every worker is gone; whatever is unresolved can no longer run.
            break;
        };
        if state.is_done() {
            break;
        }
        let handoff = match cursor.next_task() {
            Some(task) => Handoff::Task(task),
            None => Handoff::Stop,
        };
        if !end.deliver(worker, handoff) {
            tracing::warn!(worker, "worker exited before receiving its handoff");
        }
    }

    // Closing the channels releases workers parked on either side of the
    // rendezvous; all tasks are resolved so none is mid-task.
    drop(end);
    let spawned = handles.len();
    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("worker thread panicked");
        }
    }

    let lost = total.saturating_sub(state.resolved());
    if lost > 0 {
        tracing::warn!(lost, "tasks left unresolved by exited workers, counted as failures");
        state.record_lost(lost);
    }

    let summary = DispatchSummary {
        total,
        successes: state.successes(),
        failures: state.failures(),
        skipped: state.skipped(),
        workers: spawned,
    };
    tracing::info!(
        total,
        successes = summary.successes,
        failures = summary.failures,
        skipped = summary.skipped,
        "dispatch finished"
    );
    summary
}
