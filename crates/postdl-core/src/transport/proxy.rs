//! Proxy address parsing (`http://[USER:PASS@]HOST:PORT`, `socks5://...`).

use std::fmt;
use thiserror::Error;

/// Default port when a SOCKS5 address omits one.
const SOCKS5_DEFAULT_PORT: u16 = 1080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProxyError {
    #[error("invalid proxy address {addr:?}: {reason}")]
    InvalidUrl { addr: String, reason: String },
    #[error("unsupported proxy scheme {0:?}: only http(s) or socks5 are supported")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    Http,
    Https,
    /// SOCKS5 with hostname resolution done by the proxy.
    Socks5,
}

/// A validated proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub kind: ProxyKind,
    pub host: String,
    pub port: u16,
    /// Userinfo from the address, still percent-encoded as written.
    pub credentials: Option<ProxyCredentials>,
}

/// Proxy authentication taken from the address userinfo.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: Option<String>,
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ProxyConfig {
    /// Parses a proxy address. `socks5://` and `socks5h://` both resolve
    /// hostnames through the proxy.
    pub fn parse(addr: &str) -> Result<Self, ProxyError> {
        let addr = addr.trim();
        let parsed = url::Url::parse(addr).map_err(|e| ProxyError::InvalidUrl {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;
        let kind = match parsed.scheme() {
            "http" => ProxyKind::Http,
            "https" => ProxyKind::Https,
            "socks5" | "socks5h" => ProxyKind::Socks5,
            other => return Err(ProxyError::UnsupportedScheme(other.to_string())),
        };
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ProxyError::InvalidUrl {
                addr: addr.to_string(),
                reason: "missing host".to_string(),
            })?
            .to_string();
        let port = parsed
            .port_or_known_default()
            .unwrap_or(SOCKS5_DEFAULT_PORT);
        let credentials = (!parsed.username().is_empty()).then(|| ProxyCredentials {
            username: parsed.username().to_string(),
            password: parsed.password().map(str::to_string),
        });
        Ok(Self {
            kind,
            host,
            port,
            credentials,
        })
    }

    /// Proxy string in the form libcurl expects, including credentials.
    /// libcurl percent-decodes the userinfo itself.
    pub fn curl_proxy_url(&self) -> String {
        let userinfo = match &self.credentials {
            Some(ProxyCredentials {
                username,
                password: Some(password),
            }) => format!("{}:{}@", username, password),
            Some(ProxyCredentials {
                username,
                password: None,
            }) => format!("{}@", username),
            None => String::new(),
        };
        format!("{}://{}{}:{}", self.scheme(), userinfo, self.host, self.port)
    }

    fn scheme(&self) -> &'static str {
        match self.kind {
            ProxyKind::Http => "http",
            ProxyKind::Https => "https",
            ProxyKind::Socks5 => "socks5h",
        }
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Shown in logs and warnings; the password never is.
        match &self.credentials {
            Some(c) => write!(
                f,
                "{}://{}@{}:{}",
                self.scheme(),
                c.username,
                self.host,
                self.port
            ),
            None => write!(f, "{}://{}:{}", self.scheme(), self.host, self.port),
        }
    }
}
