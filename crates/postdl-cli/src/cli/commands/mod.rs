//! CLI command handlers. Each command is in its own file.

mod download;
mod search;

pub use download::run_download;
pub use search::run_search;

use postdl_core::config::PostdlConfig;
use postdl_core::search::SearchClient;
use postdl_core::transport::{CurlTransport, Transport};
use std::sync::Arc;

/// Builds the shared transport. An unusable proxy is reported and the
/// transport falls back to direct connections.
fn build_transport(cfg: &PostdlConfig) -> Arc<dyn Transport> {
    let (options, proxy_error) = cfg.transport_options();
    if let Some(e) = proxy_error {
        eprintln!("[WARN] Proxy is not used: {}", e);
        tracing::warn!("proxy disabled: {}", e);
    }
    if let Some(proxy) = &options.proxy {
        tracing::info!(%proxy, "using proxy");
    }
    Arc::new(CurlTransport::new(options))
}

fn search_client(cfg: &PostdlConfig, transport: Arc<dyn Transport>) -> SearchClient {
    SearchClient::new(cfg.api_url.clone(), transport)
}

fn print_page(page: usize, count: usize) {
    println!("Fetching page {}... fetched {} posts", page, count);
}
