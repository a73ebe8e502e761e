//! `postdl download` – search, then download every match with the worker pool.

use anyhow::{Context, Result};
use postdl_core::config::PostdlConfig;
use postdl_core::dispatcher::{self, ProgressEvent};
use postdl_core::search::SearchQuery;
use postdl_core::storage::{self, FileSink, Sink};
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{build_transport, print_page, search_client};

pub async fn run_download(cfg: &PostdlConfig, query: SearchQuery) -> Result<()> {
    let transport = build_transport(cfg);
    let client = search_client(cfg, Arc::clone(&transport));
    let tasks = tokio::task::spawn_blocking(move || client.collect_tasks(&query, print_page))
        .await
        .context("search task join")??;

    let options = cfg.dispatch_options();
    println!(
        "Found {} posts. Starting download with {} workers...\n",
        tasks.len(),
        options.effective_workers(tasks.len())
    );

    let out_dir = storage::prepare_output_dir(&std::env::current_dir()?, &cfg.out_dir)?;
    tracing::info!(out_dir = %out_dir.display(), posts = tasks.len(), "starting download");
    let sink: Arc<dyn Sink> = Arc::new(FileSink::new(out_dir));

    let (progress_tx, mut progress_rx) = dispatcher::progress_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            match event {
                ProgressEvent::Failed { .. } => eprintln!("{}", event),
                _ => println!("{}", event),
            }
        }
    });

    let summary = tokio::task::spawn_blocking(move || {
        dispatcher::dispatch(tasks, &options, transport, sink, Some(progress_tx))
    })
    .await
    .context("dispatch task join")?;
    join_printer(printer).await;

    println!(
        "\nAll done! {} posts downloaded and saved. ({} failed to download)",
        summary.successes, summary.failures
    );
    if summary.skipped > 0 {
        println!("{} of them were already on disk.", summary.skipped);
    }
    Ok(())
}

/// Waits for the progress printer. A printer that panicked or was cancelled
/// is logged; the download result stands either way.
async fn join_printer(printer: JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("progress printer stopped early: {}", e);
            false
        }
    }
}
