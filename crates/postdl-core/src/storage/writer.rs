//! Temp-file writer with atomic finalize.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writer for one payload's temp file. `finalize` renames it into place.
pub struct PayloadWriter {
    file: File,
    temp_path: PathBuf,
}

impl PayloadWriter {
    /// Create the temp file at `temp_path` (e.g. `42.jpg.part`).
    /// Truncates a leftover temp file from an interrupted run.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        Ok(Self {
            file,
            temp_path: temp_path.to_path_buf(),
        })
    }

    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_all()
    }

    /// Atomically rename the temp file to `final_path`, closing it first.
    /// Fails if `final_path` is on a different filesystem.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        let temp_path = self.temp_path;
        drop(self.file);
        std::fs::rename(&temp_path, final_path)
    }

    /// Remove the temp file after a failed write.
    pub fn discard(self) {
        let temp_path = self.temp_path;
        drop(self.file);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::debug!(path = %temp_path.display(), "could not remove temp file: {}", e);
        }
    }
}
