//! Shared client adding retry with exponential backoff on top of a [`Transport`].

use log::debug;
use std::time::Duration;
use tokio::time::sleep;

use crate::core::constants::{http_status, timeouts};
use crate::core::error::Result;
use crate::core::types::ProbeConfig;
use crate::probing::transport::{ProbeMethod, ReqwestTransport, Transport, TransportError};

/// Whether a response status is worth another attempt.
pub fn is_retryable_status(status: u16) -> bool {
    http_status::RETRYABLE.contains(&status)
}

/// One client per run, shared by every worker.
///
/// Retries apply to connection-level failures and to 429/500/502/503/504
/// responses, up to `max_retries` extra attempts. Each attempt is bounded by
/// the transport's connect/read timeouts.
#[derive(Debug)]
pub struct RetryClient<T> {
    transport: T,
    max_retries: u32,
    backoff_factor: Duration,
}

impl RetryClient<ReqwestTransport> {
    /// Build the production client (pooled reqwest transport) for a run.
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> RetryClient<T> {
    pub fn new(transport: T, config: &ProbeConfig) -> Self {
        Self::with_policy(transport, config.max_retries(), config.backoff_factor())
    }

    pub fn with_policy(transport: T, max_retries: u32, backoff_factor: Duration) -> Self {
        Self {
            transport,
            max_retries,
            backoff_factor,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `attempt + 1`: `factor * 2^attempt`, capped.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt);
        self.backoff_factor
            .saturating_mul(multiplier)
            .min(Duration::from_millis(timeouts::MAX_BACKOFF_MS))
    }

    /// Send `method url`, retrying transient failures.
    ///
    /// Returns the last status code once it is not retryable or retries run
    /// out, or the last transport error if no response was ever obtained.
    pub async fn execute(
        &self,
        method: ProbeMethod,
        url: &str,
    ) -> std::result::Result<u16, TransportError> {
        let mut attempt = 0;

        loop {
            let outcome = self.transport.send(method, url).await;
            let retryable = match &outcome {
                Ok(status) => is_retryable_status(*status),
                Err(err) => err.is_retryable(),
            };

            if !retryable || attempt >= self.max_retries {
                return outcome;
            }

            let delay = self.backoff_delay(attempt);
            match &outcome {
                Ok(status) => debug!(
                    "{method} {url} -> {status}, retry {}/{} in {}ms",
                    attempt + 1,
                    self.max_retries,
                    delay.as_millis()
                ),
                Err(err) => debug!(
                    "{method} {url} failed ({err}), retry {}/{} in {}ms",
                    attempt + 1,
                    self.max_retries,
                    delay.as_millis()
                ),
            }

            sleep(delay).await;
            attempt += 1;
        }
    }
}
