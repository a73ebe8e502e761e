//! libcurl-backed transport.

use std::time::Duration;

use super::proxy::ProxyConfig;
use super::{FetchError, Transport};

/// Browser-like user agent sent with every request; the search API rejects
/// some default client agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.3; Win64; x64; rv:6.1) Gecko/20100101 Firefox/6.1.9";

/// Settings for [`CurlTransport`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Route every request through this proxy; `None` connects directly.
    pub proxy: Option<ProxyConfig>,
    /// Connect timeout (also used as the proxy dial timeout).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Transport that performs one libcurl easy transfer per fetch.
/// Safe to share between worker threads; each fetch owns its own handle.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: TransportOptions,
}

impl CurlTransport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.options.user_agent)?;
        easy.connect_timeout(self.options.timeout)?;
        // Abort stalled transfers: below 1 KiB/s for 60s.
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        if let Some(proxy) = &self.options.proxy {
            easy.proxy(&proxy.curl_proxy_url())?;
        }
        Ok(())
    }
}

impl Transport for CurlTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        tracing::trace!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
