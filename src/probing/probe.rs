//! One liveness check for one URL.

use log::debug;

use crate::core::constants::http_status;
use crate::core::types::{ProbeConfig, ProbeResult, ProbeStatus};
use crate::probing::client::RetryClient;
use crate::probing::normalize::{ensure_scheme, normalize};
use crate::probing::transport::{ProbeMethod, Transport};

/// Whether a HEAD response means the server rejects HEAD and GET should be tried.
pub fn head_rejected(status: u16) -> bool {
    http_status::HEAD_REJECTED.contains(&status)
}

/// Probe a raw input string and classify the outcome.
///
/// Blank input short-circuits to [`ProbeStatus::EmptyUrl`] without a request.
/// Otherwise a HEAD is sent (or a GET when `prefer_get` is set); a HEAD
/// answered with 403 or 405 is re-issued once as GET. Network failures that
/// survive the client's retries become [`ProbeStatus::CouldNotConnect`]. This
/// function never fails.
pub async fn probe<T: Transport>(
    client: &RetryClient<T>,
    raw: &str,
    config: &ProbeConfig,
) -> ProbeResult {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return ProbeResult::empty();
    }
    let url = ensure_scheme(&normalized);

    let outcome = if config.prefer_get() {
        client.execute(ProbeMethod::Get, &url).await
    } else {
        match client.execute(ProbeMethod::Head, &url).await {
            Ok(status) if head_rejected(status) => {
                debug!("HEAD {url} -> {status}, falling back to GET");
                client.execute(ProbeMethod::Get, &url).await
            }
            other => other,
        }
    };

    let status = match outcome {
        Ok(code) => ProbeStatus::from_status_code(code),
        Err(err) => {
            debug!("{url} could not connect: {err}");
            ProbeStatus::CouldNotConnect
        }
    };

    ProbeResult::new(url, status)
}
