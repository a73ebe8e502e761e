//! Progress stream for terminal display.
//!
//! Every event is a discrete line, so the channel is unbounded: a slow
//! consumer never blocks a worker and never loses a line. A dropped receiver
//! only discards what is sent after it is gone.

use std::fmt;
use std::path::PathBuf;

/// One line of human-readable progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    WorkerSpawned {
        worker: usize,
    },
    Started {
        worker: usize,
        completed: usize,
        total: usize,
        task_id: u64,
        dest: PathBuf,
    },
    Skipped {
        worker: usize,
        task_id: u64,
        dest: PathBuf,
    },
    Failed {
        worker: usize,
        task_id: u64,
        error: String,
    },
}

pub type ProgressSender = tokio::sync::mpsc::UnboundedSender<ProgressEvent>;
pub type ProgressReceiver = tokio::sync::mpsc::UnboundedReceiver<ProgressEvent>;

/// Creates the channel the dispatcher reports progress on.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

impl ProgressEvent {
    pub fn worker(&self) -> usize {
        match self {
            ProgressEvent::WorkerSpawned { worker }
            | ProgressEvent::Started { worker, .. }
            | ProgressEvent::Skipped { worker, .. }
            | ProgressEvent::Failed { worker, .. } => *worker,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, ProgressEvent::Failed { .. })
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::WorkerSpawned { worker } => write!(f, "[w{}] started", worker),
            ProgressEvent::Started {
                worker,
                completed,
                total,
                task_id,
                dest,
            } => write!(
                f,
                "[{}/{}] [w{}] Downloading post {} -> {}",
                completed,
                total,
                worker,
                task_id,
                dest.display()
            ),
            ProgressEvent::Skipped {
                worker,
                task_id,
                dest,
            } => write!(
                f,
                "[w{}] File exists, skip post {} ({})",
                worker,
                task_id,
                dest.display()
            ),
            ProgressEvent::Failed {
                worker,
                task_id,
                error,
            } => write!(f, "[w{}] Failed to download post {}: {}", worker, task_id, error),
        }
    }
}

pub(super) fn emit(tx: Option<&ProgressSender>, event: ProgressEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_line_matches_terminal_format() {
        let e = ProgressEvent::Started {
            worker: 2,
            completed: 5,
            total: 40,
            task_id: 42,
            dest: PathBuf::from("dl/42.jpg"),
        };
        assert_eq!(e.to_string(), "[5/40] [w2] Downloading post 42 -> dl/42.jpg");
        assert_eq!(e.worker(), 2);
        assert!(!e.is_diagnostic());
    }

    #[test]
    fn failed_line_names_worker_and_post() {
        let e = ProgressEvent::Failed {
            worker: 1,
            task_id: 9,
            error: "HTTP 404".into(),
        };
        assert_eq!(e.to_string(), "[w1] Failed to download post 9: HTTP 404");
        assert!(e.is_diagnostic());
    }

    #[test]
    fn emit_without_consumer_is_a_no_op() {
        emit(None, ProgressEvent::WorkerSpawned { worker: 1 });
        let (tx, rx) = progress_channel();
        drop(rx);
        emit(Some(&tx), ProgressEvent::WorkerSpawned { worker: 1 });
    }

    #[test]
    fn undrained_channel_keeps_every_failure_line() {
        let (tx, mut rx) = progress_channel();
        for task_id in 0..500 {
            emit(
                Some(&tx),
                ProgressEvent::Failed {
                    worker: 1,
                    task_id,
                    error: "HTTP 500".into(),
                },
            );
        }
        drop(tx);
        let mut seen = Vec::new();
        while let Ok(e) = rx.try_recv() {
            if let ProgressEvent::Failed { task_id, .. } = e {
                seen.push(task_id);
            }
        }
        assert_eq!(seen, (0..500).collect::<Vec<u64>>());
    }
}
