//! `postdl search` – list matching posts without downloading.

use anyhow::{Context, Result};
use postdl_core::config::PostdlConfig;
use postdl_core::search::SearchQuery;

use super::{build_transport, print_page, search_client};

pub async fn run_search(cfg: &PostdlConfig, query: SearchQuery) -> Result<()> {
    let client = search_client(cfg, build_transport(cfg));
    let tasks = tokio::task::spawn_blocking(move || client.collect_tasks(&query, print_page))
        .await
        .context("search task join")??;

    if tasks.is_empty() {
        println!("No posts found.");
        return Ok(());
    }
    for task in &tasks {
        println!("{}\t{}", task.id, task.file_url);
    }
    println!("\nFound {} posts.", tasks.len());
    Ok(())
}
