//! Persistence sink: deterministic destination paths and atomic writes.
//!
//! Payloads are written to `<dest>.part`, synced, then renamed into place so a
//! crashed run never leaves a truncated file under the final name (which would
//! later be mistaken for a completed download and skipped).

mod writer;

pub use writer::PayloadWriter;

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};

use crate::task::Task;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Where and how task payloads are stored.
pub trait Sink: Send + Sync {
    /// Deterministic destination for `task`.
    fn destination(&self, task: &Task) -> PathBuf;

    /// True if the destination already holds a file (the task is satisfied).
    fn exists(&self, task: &Task) -> bool {
        self.destination(task).is_file()
    }

    /// Write `payload` for `task`; returns the final path.
    fn persist(&self, task: &Task, payload: &[u8]) -> io::Result<PathBuf>;
}

/// Sink that stores each task as `<out_dir>/<id><ext>`.
#[derive(Debug, Clone)]
pub struct FileSink {
    out_dir: PathBuf,
}

impl FileSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl Sink for FileSink {
    fn destination(&self, task: &Task) -> PathBuf {
        self.out_dir.join(task.file_name())
    }

    fn persist(&self, task: &Task, payload: &[u8]) -> io::Result<PathBuf> {
        let final_path = self.destination(task);
        let mut writer = PayloadWriter::create(&temp_path(&final_path))?;
        let written = writer.write_all(payload).and_then(|()| writer.sync());
        if let Err(e) = written {
            writer.discard();
            return Err(e);
        }
        writer.finalize(&final_path)?;
        Ok(final_path)
    }
}

/// Path for the temp file: appends `.part` to the final path (e.g. `42.jpg` → `42.jpg.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Resolve `dir` against `base` (when relative) and create it.
pub fn prepare_output_dir(base: &Path, dir: &Path) -> Result<PathBuf> {
    let resolved = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        base.join(dir)
    };
    std::fs::create_dir_all(&resolved).with_context(|| {
        format!(
            "cannot create output directory ({}). Do you have the right permissions?",
            resolved.display()
        )
    })?;
    Ok(resolved)
}
