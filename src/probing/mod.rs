//! URL liveness probing
//!
//! This module holds the probe engine: input normalization, the HTTP
//! transport seam, the retrying client, single-URL probes, the bounded
//! scheduler and result summaries.

pub mod client;
pub mod normalize;
pub mod probe;
pub mod scheduler;
pub mod summary;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use crate::core::error::Result;
use crate::core::types::{ProbeConfig, RunResult};

// Re-export commonly used items
pub use client::{RetryClient, is_retryable_status};
pub use normalize::{ensure_scheme, normalize};
pub use probe::probe;
pub use scheduler::{NoProgress, ProgressSink, Scheduler};
pub use summary::summarize;
pub use transport::{ProbeMethod, ReqwestTransport, Transport, TransportError, TransportErrorKind};

/// Check every URL with the production HTTP client.
///
/// The only error is a configuration error, raised before any request.
pub async fn run_checks(
    urls: &[String],
    config: ProbeConfig,
    progress: Arc<dyn ProgressSink>,
) -> Result<RunResult> {
    let scheduler = Scheduler::from_config(config)?;
    Ok(scheduler.run(urls, progress).await)
}
