//! Worker loop: take one task, fetch and persist it, report, repeat.

use std::sync::Arc;

use crate::storage::Sink;
use crate::transport::Transport;

use super::execute::{fetch_and_persist, Outcome};
use super::progress::{emit, ProgressEvent, ProgressSender};
use super::protocol::{Handoff, WorkerLink};
use super::state::ProgressState;

/// Everything a worker thread shares with the rest of the pool.
pub(super) struct WorkerContext {
    pub state: Arc<ProgressState>,
    pub transport: Arc<dyn Transport>,
    pub sink: Arc<dyn Sink>,
    pub progress_tx: Option<ProgressSender>,
}

/// Runs until the dispatcher sends `Stop` or goes away. Task failures are
/// counted and reported, never propagated.
pub(super) fn run(link: WorkerLink, ctx: WorkerContext) {
    let worker = link.id();
    let progress = ctx.progress_tx.as_ref();
    loop {
        let completed = ctx.state.begin_attempt();
        let task = match link.next_handoff() {
            Handoff::Task(task) => task,
            Handoff::Stop => break,
        };

        let dest = ctx.sink.destination(&task);
        tracing::info!(
            "[{}/{}] [w{}] Downloading post {} -> {}",
            completed,
            ctx.state.total(),
            worker,
            task.id,
            dest.display()
        );
        emit(
            progress,
            ProgressEvent::Started {
                worker,
                completed,
                total: ctx.state.total(),
                task_id: task.id,
                dest,
            },
        );

        match fetch_and_persist(&task, ctx.transport.as_ref(), ctx.sink.as_ref()) {
            Ok(Outcome::Written { bytes, .. }) => {
                tracing::debug!(worker, id = task.id, bytes, "saved");
                ctx.state.record_success(false);
            }
            Ok(Outcome::Skipped { path }) => {
                emit(
                    progress,
                    ProgressEvent::Skipped {
                        worker,
                        task_id: task.id,
                        dest: path,
                    },
                );
                ctx.state.record_success(true);
            }
            Err(e) => {
                tracing::warn!("[w{}] Failed to download post {}: {}", worker, task.id, e);
                emit(
                    progress,
                    ProgressEvent::Failed {
                        worker,
                        task_id: task.id,
                        error: e.to_string(),
                    },
                );
                ctx.state.record_failure();
            }
        }

        if !link.request_work() {
            break;
        }
    }
    tracing::debug!(worker, "worker exiting");
}
