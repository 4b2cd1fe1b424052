//! The seam between the probe engine and the HTTP stack.
//!
//! [`Transport`] issues exactly one request and reports the status line, or a
//! classified failure. [`ReqwestTransport`] is the production implementation;
//! tests substitute their own.

use async_trait::async_trait;
use log::debug;
use reqwest::redirect::Policy;
use std::fmt;
use std::time::Duration;

use crate::core::constants::timeouts;
use crate::core::error::{Result, UrlPulseError};
use crate::core::types::ProbeConfig;

/// HTTP methods used by probes. Both are idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Head,
    Get,
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMethod::Head => write!(f, "HEAD"),
            ProbeMethod::Get => write!(f, "GET"),
        }
    }
}

/// Why no HTTP response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connect or read timeout exceeded
    Timeout,
    /// DNS, refused/reset connection, TLS handshake
    Connect,
    /// Redirect limit exceeded
    Redirect,
    /// The URL could not be turned into a request
    InvalidUrl,
    /// Any other failure while sending or reading the response head
    Other,
}

/// A failed attempt, with the message of the underlying error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new<S: Into<String>>(kind: TransportErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::Timeout | TransportErrorKind::Connect | TransportErrorKind::Other
        )
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_redirect() {
            TransportErrorKind::Redirect
        } else if err.is_builder() {
            TransportErrorKind::InvalidUrl
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        let message = std::error::Error::source(&err)
            .map(|e| e.to_string())
            .unwrap_or_else(|| err.to_string());
        Self::new(kind, message)
    }
}

/// Sends one request and returns the response status code.
///
/// Implementations must be safe to share between workers without external
/// locking, and must not read response bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: ProbeMethod,
        url: &str,
    ) -> std::result::Result<u16, TransportError>;
}

/// Connection-pooled transport on top of `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the shared client for one run.
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        let redirect_policy = if config.follow_redirects() {
            Policy::limited(config.max_redirects())
        } else {
            Policy::none()
        };

        let mut client_builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .redirect(redirect_policy)
            .user_agent(config.user_agent());

        // Connection pooling sized for the worker count
        client_builder = client_builder
            .pool_max_idle_per_host(config.pool_idle_per_host())
            .pool_idle_timeout(Duration::from_secs(timeouts::POOL_IDLE_SECONDS))
            .tcp_keepalive(Duration::from_secs(timeouts::TCP_KEEPALIVE_SECONDS));

        if config.insecure() {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy_url) = config.proxy() {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                UrlPulseError::Config(format!("Proxy '{proxy_url}' is not usable: {e}"))
            })?;
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder.build()?;
        debug!(
            "HTTP client ready: pool_idle_per_host={}, connect_timeout={}ms, read_timeout={}ms",
            config.pool_idle_per_host(),
            config.connect_timeout().as_millis(),
            config.read_timeout().as_millis()
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        method: ProbeMethod,
        url: &str,
    ) -> std::result::Result<u16, TransportError> {
        let request = match method {
            ProbeMethod::Head => self.client.head(url),
            ProbeMethod::Get => self.client.get(url),
        };

        // `send` resolves once the status line and headers are in; the body
        // is never polled and the connection is released when `response` drops.
        let response = request.send().await?;
        let status = response.status().as_u16();
        drop(response);

        Ok(status)
    }
}
