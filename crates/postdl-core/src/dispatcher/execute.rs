//! Fetch-and-persist for a single task.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::storage::Sink;
use crate::task::Task;
use crate::transport::{FetchError, Transport};

/// Successful result of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Payload fetched and written.
    Written { path: PathBuf, bytes: usize },
    /// Destination already existed; nothing was fetched.
    Skipped { path: PathBuf },
}

/// Why a task failed. Never fatal to the run.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("fetch {url}: {source}")]
    Fetch { url: String, source: FetchError },
    #[error("write {}: {source}", path.display())]
    Storage { path: PathBuf, source: io::Error },
}

/// Skips tasks whose destination exists, otherwise fetches the payload and
/// hands it to the sink.
pub fn fetch_and_persist(
    task: &Task,
    transport: &dyn Transport,
    sink: &dyn Sink,
) -> Result<Outcome, TaskError> {
    let path = sink.destination(task);
    if sink.exists(task) {
        tracing::debug!(id = task.id, path = %path.display(), "file exists, skip");
        return Ok(Outcome::Skipped { path });
    }

    let payload = transport
        .fetch(&task.file_url)
        .map_err(|source| TaskError::Fetch {
            url: task.file_url.clone(),
            source,
        })?;
    let bytes = payload.len();
    let path = sink
        .persist(task, &payload)
        .map_err(|source| TaskError::Storage { path, source })?;
    Ok(Outcome::Written { path, bytes })
}
