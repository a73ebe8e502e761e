//! Logging setup. Runs log to `$XDG_STATE_HOME/postdl/postdl.log`; the
//! terminal is kept for progress lines. `RUST_LOG` overrides the filters.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter for the log file: worker progress from both crates at debug.
const FILE_FILTER: &str = "info,postdl=debug,postdl_core=debug";
/// Filter for the stderr fallback: only what the user should see next to progress.
const STDERR_FILTER: &str = "warn";

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Path of the run log, creating its directory.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("postdl")?;
    let dir = xdg_dirs.get_state_home().join("postdl");
    fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    Ok(dir.join("postdl.log"))
}

/// Logs to the run log with worker thread names. Errors (unwritable state
/// dir, subscriber already set) leave the choice of fallback to the caller.
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_or(FILE_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!(path = %path.display(), "postdl logging initialized");
    Ok(())
}

/// Logs warnings and errors to stderr. Used when the run log is unavailable.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or(STDERR_FILTER))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_parse() {
        assert!(EnvFilter::try_new(FILE_FILTER).is_ok());
        assert!(EnvFilter::try_new(STDERR_FILTER).is_ok());
    }

    #[test]
    fn stderr_fallback_can_be_installed_twice() {
        init_logging_stderr();
        init_logging_stderr();
        tracing::warn!("fallback logger active");
    }
}
