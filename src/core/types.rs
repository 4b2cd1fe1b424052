use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

use crate::core::constants::{defaults, http_status, labels, limits, timeouts};
use crate::core::error::{Result, UrlPulseError};

/// One raw line of input, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRequest {
    /// The string exactly as supplied by the caller
    pub raw: String,
}

impl UrlRequest {
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Self { raw: raw.into() }
    }
}

impl From<&str> for UrlRequest {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Settings for one run of the probe engine.
///
/// Constructed once through [`ProbeConfig::builder`] (or `Default`) and only
/// read afterwards; every instance that exists has passed [`ProbeConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    worker_count: usize,
    connect_timeout: Duration,
    read_timeout: Duration,
    max_retries: u32,
    backoff_factor: Duration,
    prefer_get: bool,
    follow_redirects: bool,
    max_redirects: usize,
    user_agent: String,
    proxy: Option<String>,
    insecure: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            connect_timeout: Duration::from_millis(timeouts::DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout: Duration::from_millis(timeouts::DEFAULT_READ_TIMEOUT_MS),
            max_retries: defaults::RETRIES,
            backoff_factor: Duration::from_millis(timeouts::DEFAULT_BACKOFF_FACTOR_MS),
            prefer_get: false,
            follow_redirects: true,
            max_redirects: defaults::MAX_REDIRECTS,
            user_agent: defaults::USER_AGENT.to_string(),
            proxy: None,
            insecure: false,
        }
    }
}

/// Worker count used when none is configured, derived from the CPU count.
pub fn default_worker_count() -> usize {
    num_cpus::get()
        .saturating_mul(defaults::WORKERS_PER_CORE)
        .clamp(defaults::MIN_DEFAULT_WORKERS, defaults::MAX_DEFAULT_WORKERS)
}

impl ProbeConfig {
    /// Create a builder starting from the default settings.
    pub fn builder() -> ProbeConfigBuilder {
        ProbeConfigBuilder {
            config: ProbeConfig::default(),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff_factor(&self) -> Duration {
        self.backoff_factor
    }

    pub fn prefer_get(&self) -> bool {
        self.prefer_get
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    /// Idle connections the pool keeps per host.
    ///
    /// Never below the worker count, so concurrent probes against one host
    /// do not queue behind each other for a pooled connection.
    pub fn pool_idle_per_host(&self) -> usize {
        self.worker_count
            .saturating_mul(2)
            .max(defaults::MIN_POOL_IDLE_PER_HOST)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(UrlPulseError::Config(
                "Worker count cannot be 0. Expected a positive integer.".to_string(),
            ));
        }
        if self.worker_count > limits::MAX_WORKERS {
            return Err(UrlPulseError::Config(format!(
                "Worker count of {} is extremely high and may cause spurious connection failures. Expected at most {}.",
                self.worker_count,
                limits::MAX_WORKERS
            )));
        }
        validate_timeout("Connect timeout", self.connect_timeout)?;
        validate_timeout("Read timeout", self.read_timeout)?;
        if self.max_retries > limits::MAX_RETRIES {
            return Err(UrlPulseError::Config(format!(
                "Retry count of {} is very high and may cause long delays. Expected at most {}.",
                self.max_retries,
                limits::MAX_RETRIES
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(UrlPulseError::Config(
                "User agent cannot be empty.".to_string(),
            ));
        }
        if let Some(ref proxy) = self.proxy
            && reqwest::Proxy::all(proxy).is_err()
        {
            return Err(UrlPulseError::Config(format!(
                "Proxy '{proxy}' is not a valid proxy URL."
            )));
        }
        Ok(())
    }
}

fn validate_timeout(name: &str, timeout: Duration) -> Result<()> {
    if timeout.is_zero() {
        return Err(UrlPulseError::Config(format!(
            "{name} cannot be 0. Expected a positive number of milliseconds."
        )));
    }
    if timeout > Duration::from_millis(timeouts::MAX_TIMEOUT_MS) {
        return Err(UrlPulseError::Config(format!(
            "{name} of {}ms is extremely large (>1 hour). Consider using a smaller value.",
            timeout.as_millis()
        )));
    }
    Ok(())
}

/// Builder for [`ProbeConfig`]; `build` validates.
#[derive(Debug, Clone)]
pub struct ProbeConfigBuilder {
    config: ProbeConfig,
}

impl ProbeConfigBuilder {
    pub fn worker_count(mut self, worker_count: usize) -> Self {
        self.config.worker_count = worker_count;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    pub fn backoff_factor(mut self, factor: Duration) -> Self {
        self.config.backoff_factor = factor;
        self
    }

    pub fn prefer_get(mut self, prefer_get: bool) -> Self {
        self.config.prefer_get = prefer_get;
        self
    }

    pub fn follow_redirects(mut self, follow_redirects: bool) -> Self {
        self.config.follow_redirects = follow_redirects;
        self
    }

    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn proxy<S: Into<String>>(mut self, proxy: Option<S>) -> Self {
        self.config.proxy = proxy.map(Into::into);
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.config.insecure = insecure;
        self
    }

    pub fn build(self) -> Result<ProbeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Classified outcome of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeStatus {
    /// HTTP 200 observed
    Working,
    /// A definite non-200 response, code kept for diagnostics
    NotWorking(u16),
    /// No HTTP response after exhausting retries
    CouldNotConnect,
    /// Blank input, no request made
    EmptyUrl,
}

impl ProbeStatus {
    /// Classify an HTTP status code.
    pub fn from_status_code(code: u16) -> Self {
        if code == http_status::OK {
            Self::Working
        } else {
            Self::NotWorking(code)
        }
    }

    /// Status code as reported in exports: the numeric code, or "000".
    pub fn status_code(&self) -> String {
        match self {
            Self::Working => http_status::OK.to_string(),
            Self::NotWorking(code) => code.to_string(),
            Self::CouldNotConnect | Self::EmptyUrl => http_status::NO_RESPONSE.to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Working => labels::WORKING,
            Self::NotWorking(_) => labels::NOT_WORKING,
            Self::CouldNotConnect => labels::COULD_NOT_CONNECT,
            Self::EmptyUrl => labels::EMPTY_URL,
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self, Self::Working)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotWorking(code) => write!(f, "{} ({code})", self.label()),
            _ => write!(f, "{}", self.label()),
        }
    }
}

impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Result of probing one input URL.
///
/// Built once by the worker that owns the input's index and never changed
/// afterwards, so the fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    url: String,
    status_code: String,
    status: ProbeStatus,
}

impl ProbeResult {
    /// Create a result for a normalized URL; the status code follows the status.
    pub fn new<S: Into<String>>(url: S, status: ProbeStatus) -> Self {
        Self {
            url: url.into(),
            status_code: status.status_code(),
            status,
        }
    }

    /// Placeholder for blank input.
    pub fn empty() -> Self {
        Self::new("", ProbeStatus::EmptyUrl)
    }

    pub fn could_not_connect<S: Into<String>>(url: S) -> Self {
        Self::new(url, ProbeStatus::CouldNotConnect)
    }

    /// URL after normalization and scheme defaulting.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Numeric status code, or "000" when no response was obtained.
    pub fn status_code(&self) -> &str {
        &self.status_code
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn is_working(&self) -> bool {
        self.status_code == http_status::OK.to_string()
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.status_code, self.url, self.status)
    }
}

/// Ordered results of a run; index `i` belongs to input URL `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RunResult(Vec<ProbeResult>);

impl RunResult {
    pub fn new(results: Vec<ProbeResult>) -> Self {
        Self(results)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProbeResult> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeResult> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ProbeResult] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<ProbeResult> {
        self.0
    }
}

impl<'a> IntoIterator for &'a RunResult {
    type Item = &'a ProbeResult;
    type IntoIter = std::slice::Iter<'a, ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for RunResult {
    type Item = ProbeResult;
    type IntoIter = std::vec::IntoIter<ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Counts derived from a [`RunResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub working_count: usize,
    pub not_working_count: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.working_count + self.not_working_count
    }

    /// Percentage of working URLs; 100 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 100.0;
        }
        self.working_count as f64 / self.total() as f64 * 100.0
    }

    /// Percentage of URLs that are not working.
    pub fn failure_rate(&self) -> f64 {
        100.0 - self.success_rate()
    }
}
