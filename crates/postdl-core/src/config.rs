use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::dispatcher::{DispatchOptions, DEFAULT_SPAWN_STAGGER, DEFAULT_WORKERS};
use crate::search::DEFAULT_PAGE_SIZE;
use crate::transport::{ProxyConfig, ProxyError, TransportOptions, DEFAULT_USER_AGENT};

/// Default search endpoint.
pub const DEFAULT_API_URL: &str = "https://api.rule34.xxx/index.php";

/// Global configuration loaded from `~/.config/postdl/config.toml`.
/// Command-line flags override individual values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostdlConfig {
    /// Search API endpoint (`index.php` of a dapi-compatible board).
    pub api_url: String,
    /// Maximum number of concurrent downloads.
    pub workers: usize,
    /// Directory posts are written to; relative paths resolve against the
    /// working directory.
    pub out_dir: PathBuf,
    /// Posts requested per search page.
    pub page_size: usize,
    /// Connect/proxy dial timeout in seconds.
    pub timeout_secs: u64,
    /// Delay between worker spawns in milliseconds.
    pub spawn_stagger_ms: u64,
    /// Optional proxy, `http://HOST:PORT` or `socks5://HOST:PORT`.
    #[serde(default)]
    pub proxy: Option<String>,
    /// User agent sent with every request; built-in default if missing.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for PostdlConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            workers: DEFAULT_WORKERS,
            out_dir: PathBuf::from("dl"),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 10,
            spawn_stagger_ms: DEFAULT_SPAWN_STAGGER.as_millis() as u64,
            proxy: None,
            user_agent: None,
        }
    }
}

impl PostdlConfig {
    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            workers: self.workers,
            spawn_stagger: Duration::from_millis(self.spawn_stagger_ms),
        }
    }

    /// Transport settings. A configured but unusable proxy is returned as an
    /// error next to direct-connection options so callers can warn and go on.
    pub fn transport_options(&self) -> (TransportOptions, Option<ProxyError>) {
        let mut options = TransportOptions {
            proxy: None,
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        };
        let proxy = self.proxy.as_deref().map(str::trim).filter(|p| !p.is_empty());
        let error = match proxy.map(ProxyConfig::parse) {
            Some(Ok(p)) => {
                options.proxy = Some(p);
                None
            }
            Some(Err(e)) => Some(e),
            None => None,
        };
        (options, error)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("postdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PostdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PostdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PostdlConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
