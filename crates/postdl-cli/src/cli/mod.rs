//! CLI for the postdl bulk downloader.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use postdl_core::config::{self, PostdlConfig};
use postdl_core::search::SearchQuery;
use std::path::PathBuf;

use commands::{run_download, run_search};

/// Top-level CLI for postdl.
#[derive(Debug, Parser)]
#[command(name = "postdl")]
#[command(about = "postdl: bulk downloader for booru-style post search APIs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by every command that queries the search API.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Tags to search for (space separated, as typed on the site).
    #[arg(long, default_value = "")]
    pub tags: String,

    /// Maximum amount of posts to grab (default: all).
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Proxy address: http://HOST:PORT or socks5://HOST:PORT.
    #[arg(long, value_name = "ADDR")]
    pub proxy: Option<String>,

    /// Connect/proxy timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Search API endpoint (overrides the config file).
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Search for posts and download every match.
    Download {
        #[command(flatten)]
        search: SearchArgs,

        /// Maximum amount of concurrent downloads.
        #[arg(long, value_name = "N")]
        concurrents: Option<usize>,

        /// The directory to write the downloaded posts to.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// List matching posts without downloading them.
    Search {
        #[command(flatten)]
        search: SearchArgs,
    },
}

impl SearchArgs {
    /// Applies the flags that were given on top of the loaded config.
    pub fn apply_to(&self, cfg: &mut PostdlConfig) {
        if let Some(proxy) = &self.proxy {
            cfg.proxy = Some(proxy.clone());
        }
        if let Some(timeout) = self.timeout {
            cfg.timeout_secs = timeout;
        }
        if let Some(api_url) = &self.api_url {
            cfg.api_url = api_url.clone();
        }
    }

    pub fn query(&self, cfg: &PostdlConfig) -> SearchQuery {
        SearchQuery::new(self.tags.clone())
            .with_limit(self.limit)
            .with_page_size(cfg.page_size)
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Download {
                search,
                concurrents,
                out,
            } => {
                search.apply_to(&mut cfg);
                if let Some(n) = concurrents {
                    cfg.workers = n;
                }
                if let Some(out) = out {
                    cfg.out_dir = out;
                }
                let query = search.query(&cfg);
                run_download(&cfg, query).await?;
            }
            CliCommand::Search { search } => {
                search.apply_to(&mut cfg);
                let query = search.query(&cfg);
                run_search(&cfg, query).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
