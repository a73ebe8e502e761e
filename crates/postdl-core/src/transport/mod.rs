//! Byte transport used for search pages and payloads.
//!
//! The dispatcher and search client only see the [`Transport`] trait; proxy,
//! timeout and user-agent settings live in the concrete [`CurlTransport`].

mod http;
mod proxy;

pub use http::{CurlTransport, TransportOptions, DEFAULT_USER_AGENT};
pub use proxy::{ProxyConfig, ProxyCredentials, ProxyError, ProxyKind};

use thiserror::Error;

/// Error returned by a single fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// libcurl reported an error (timeout, connection, proxy, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Any other transport failure (used by alternative transports).
    #[error("{0}")]
    Other(String),
}

/// Fetches the full body at a URL.
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
