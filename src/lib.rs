//! # urlpulse
//!
//! Check the liveness of a list of URLs with bounded concurrency.
//!
//! Every input string becomes exactly one [`ProbeResult`], reported in input
//! order regardless of which request finished first. A URL is `Working` only
//! when it answers HTTP 200; any other response is `NotWorking(code)`, and a
//! URL that never produced a response after the configured retries is
//! `CouldNotConnect`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use urlpulse::{NoProgress, ProbeConfig, run_checks, summarize};
//!
//! # async fn demo() -> urlpulse::Result<()> {
//! let urls = vec!["example.com".to_string(), "https://example.org/missing".to_string()];
//! let results = run_checks(&urls, ProbeConfig::default(), Arc::new(NoProgress)).await?;
//! let summary = summarize(&results);
//! println!("{} of {} working", summary.working_count, summary.total());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod probing;
pub mod reporting;
pub mod source;
pub mod ui;

pub use crate::config::{CliConfig, Config};
pub use crate::core::{
    ProbeConfig, ProbeConfigBuilder, ProbeResult, ProbeStatus, Result, RunResult, Summary,
    UrlPulseError, UrlRequest,
};
pub use crate::probing::{
    NoProgress, ProgressSink, RetryClient, Scheduler, Transport, TransportError,
    TransportErrorKind, probe, run_checks, summarize,
};
