//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments, and turns the merged result into the
//! validated [`ProbeConfig`] the probe engine runs with.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::constants::{defaults, limits, output_formats, source, timeouts};
use crate::core::error::{Result, UrlPulseError};
use crate::core::types::{ProbeConfig, default_worker_count};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of concurrent probe workers
    pub workers: Option<usize>,

    /// Connect timeout per attempt, in milliseconds
    pub connect_timeout_ms: Option<u64>,

    /// Read timeout per attempt, in milliseconds
    pub read_timeout_ms: Option<u64>,

    /// Retries after the first attempt for transient failures
    pub retries: Option<u32>,

    /// Backoff factor in milliseconds; retry n waits factor * 2^n
    pub backoff_factor_ms: Option<u64>,

    /// Probe with GET directly instead of HEAD first
    pub prefer_get: Option<bool>,

    /// Follow redirects; when false a 3xx is reported as not working
    pub follow_redirects: Option<bool>,

    /// Redirect limit when following redirects
    pub max_redirects: Option<usize>,

    /// Custom User-Agent header
    pub user_agent: Option<String>,

    /// HTTP/HTTPS proxy URL
    pub proxy: Option<String>,

    /// Skip TLS certificate verification
    pub insecure: Option<bool>,

    /// Timeout in seconds for downloading remote URL lists
    pub fetch_timeout: Option<u64>,

    /// Output format (text, json, minimal, csv)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// URL patterns to drop from the list before probing (regex)
    pub exclude_patterns: Option<Vec<String>>,

    /// Fail only if more than X% of URLs are not working (0-100)
    pub failure_threshold: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: None, // Derived from CPU count at runtime
            connect_timeout_ms: Some(timeouts::DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout_ms: Some(timeouts::DEFAULT_READ_TIMEOUT_MS),
            retries: Some(defaults::RETRIES),
            backoff_factor_ms: Some(timeouts::DEFAULT_BACKOFF_FACTOR_MS),
            prefer_get: Some(false),
            follow_redirects: Some(true),
            max_redirects: Some(defaults::MAX_REDIRECTS),
            user_agent: None,
            proxy: None,
            insecure: Some(false),
            fetch_timeout: Some(timeouts::DEFAULT_FETCH_TIMEOUT_SECONDS),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            exclude_patterns: None,
            failure_threshold: None, // Fail on any URL that is not working
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults for missing keys
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            UrlPulseError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            UrlPulseError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        if let Ok(config) = Self::load_from_file(source::CONFIG_FILE_NAME) {
            return config;
        }

        for i in 1..=source::CONFIG_PARENT_LEVELS {
            let path = format!("{}{}", "../".repeat(i), source::CONFIG_FILE_NAME);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Concurrency & timeouts
        if let Some(workers) = cli_config.workers {
            self.workers = Some(workers);
        }
        if let Some(connect_timeout) = cli_config.connect_timeout_ms {
            self.connect_timeout_ms = Some(connect_timeout);
        }
        if let Some(read_timeout) = cli_config.read_timeout_ms {
            self.read_timeout_ms = Some(read_timeout);
        }

        // Retry behaviour
        if let Some(retries) = cli_config.retries {
            self.retries = Some(retries);
        }
        if let Some(backoff) = cli_config.backoff_factor_ms {
            self.backoff_factor_ms = Some(backoff);
        }

        // Request shape
        if cli_config.prefer_get {
            self.prefer_get = Some(true);
        }
        if cli_config.no_redirects {
            self.follow_redirects = Some(false);
        }
        if let Some(ref user_agent) = cli_config.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        if let Some(ref proxy) = cli_config.proxy {
            self.proxy = Some(proxy.clone());
        }
        if cli_config.insecure {
            self.insecure = Some(true);
        }

        // Input & exit policy
        if let Some(ref exclude_patterns) = cli_config.exclude_patterns {
            self.exclude_patterns = Some(exclude_patterns.clone());
        }
        if let Some(threshold) = cli_config.failure_threshold {
            self.failure_threshold = Some(threshold);
        }

        // Output & format
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
    }

    /// Build the validated settings for one probe run
    pub fn probe_config(&self) -> Result<ProbeConfig> {
        ProbeConfig::builder()
            .worker_count(self.workers.unwrap_or_else(default_worker_count))
            .connect_timeout(Duration::from_millis(
                self.connect_timeout_ms
                    .unwrap_or(timeouts::DEFAULT_CONNECT_TIMEOUT_MS),
            ))
            .read_timeout(Duration::from_millis(
                self.read_timeout_ms
                    .unwrap_or(timeouts::DEFAULT_READ_TIMEOUT_MS),
            ))
            .max_retries(self.retries.unwrap_or(defaults::RETRIES))
            .backoff_factor(Duration::from_millis(
                self.backoff_factor_ms
                    .unwrap_or(timeouts::DEFAULT_BACKOFF_FACTOR_MS),
            ))
            .prefer_get(self.prefer_get.unwrap_or(false))
            .follow_redirects(self.follow_redirects.unwrap_or(true))
            .max_redirects(self.max_redirects.unwrap_or(defaults::MAX_REDIRECTS))
            .user_agent(
                self.user_agent
                    .clone()
                    .unwrap_or_else(|| defaults::USER_AGENT.to_string()),
            )
            .proxy(self.proxy.clone())
            .insecure(self.insecure.unwrap_or(false))
            .build()
    }

    /// Compile exclude patterns into regex objects
    pub fn compile_exclude_patterns(&self) -> Result<Vec<Regex>> {
        let mut compiled = Vec::new();
        if let Some(ref patterns) = self.exclude_patterns {
            for pattern in patterns {
                compiled.push(Regex::new(pattern)?);
            }
        }
        Ok(compiled)
    }

    /// Get remote list fetch timeout as Duration
    pub fn fetch_timeout_duration(&self) -> Duration {
        Duration::from_secs(
            self.fetch_timeout
                .unwrap_or(timeouts::DEFAULT_FETCH_TIMEOUT_SECONDS),
        )
    }

    /// Output format, falling back to the default
    pub fn output_format(&self) -> &str {
        self.output_format
            .as_deref()
            .unwrap_or(output_formats::DEFAULT)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Probe settings carry their own range checks
        self.probe_config()?;

        if self.fetch_timeout == Some(0) {
            return Err(UrlPulseError::Config(
                "Fetch timeout cannot be 0. Expected a positive integer representing seconds."
                    .to_string(),
            ));
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(UrlPulseError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        if let Some(threshold) = self.failure_threshold {
            const EPSILON: f64 = 1e-10;
            if !(limits::MIN_PERCENTAGE - EPSILON..=limits::MAX_PERCENTAGE + EPSILON)
                .contains(&threshold)
            {
                return Err(UrlPulseError::Config(format!(
                    "Failure threshold {threshold}% is invalid. Expected a value between 0-100."
                )));
            }
        }

        // Validate exclude patterns by trying to compile them
        self.compile_exclude_patterns()?;

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Concurrency & timeouts
    pub workers: Option<usize>,            // --workers
    pub connect_timeout_ms: Option<u64>,   // --connect-timeout
    pub read_timeout_ms: Option<u64>,      // --read-timeout

    // Retry behaviour
    pub retries: Option<u32>,              // --retries
    pub backoff_factor_ms: Option<u64>,    // --backoff

    // Request shape
    pub prefer_get: bool,                  // --prefer-get
    pub no_redirects: bool,                // --no-redirects
    pub user_agent: Option<String>,        // --user-agent
    pub proxy: Option<String>,             // --proxy
    pub insecure: bool,                    // --insecure

    // Input & exit policy
    pub exclude_patterns: Option<Vec<String>>, // --exclude-pattern
    pub failure_threshold: Option<f64>,        // --failure-threshold

    // Output & format
    pub quiet: bool,                       // --quiet
    pub verbose: bool,                     // --verbose
    pub output_format: Option<String>,     // --format
    pub output_file: Option<String>,       // --output
    pub no_progress: bool,                 // --no-progress

    // Configuration
    pub config_file: Option<String>,       // --config
    pub no_config: bool,                   // --no-config
}
