// Command-line interface definitions and parsing for urlpulse

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// URL list files, '-' for stdin, or http(s) URLs of remote lists
    #[arg(value_name = "INPUTS")]
    pub inputs: Vec<String>,

    // Concurrency & Timeouts
    /// Concurrent probe workers (default: 4 per CPU core, 8-32)
    #[arg(long, value_name = "COUNT", help_heading = "Concurrency & Timeouts")]
    pub workers: Option<usize>,

    /// Connect timeout per attempt in ms (default: 5000)
    #[arg(long, value_name = "MS", help_heading = "Concurrency & Timeouts")]
    pub connect_timeout: Option<u64>,

    /// Read timeout per attempt in ms (default: 10000)
    #[arg(long, value_name = "MS", help_heading = "Concurrency & Timeouts")]
    pub read_timeout: Option<u64>,

    // Retry & Exit Policy
    /// Retries for transient failures after the first attempt (default: 2)
    #[arg(long, value_name = "COUNT", help_heading = "Retry & Exit Policy")]
    pub retries: Option<u32>,

    /// Backoff factor in ms; retry n waits factor * 2^n (default: 300)
    #[arg(long, value_name = "MS", help_heading = "Retry & Exit Policy")]
    pub backoff: Option<u64>,

    /// Failure threshold - fail only if more than X% of URLs are not working (0-100)
    #[arg(long, value_name = "PERCENT", help_heading = "Retry & Exit Policy")]
    pub failure_threshold: Option<f64>,

    // Requests
    /// Probe with GET directly instead of HEAD first
    #[arg(long, help_heading = "Requests")]
    pub prefer_get: bool,

    /// Do not follow redirects; a 3xx is reported as not working
    #[arg(long, help_heading = "Requests")]
    pub no_redirects: bool,

    /// URL patterns to exclude (regex)
    #[arg(long, value_name = "REGEX", help_heading = "Requests")]
    pub exclude_pattern: Vec<String>,

    // Output & Verbosity
    /// Suppress progress and summary output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format (default: text)
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Also write a CSV report to this file
    #[arg(short = 'o', long, value_name = "FILE", help_heading = "Output & Verbosity")]
    pub output: Option<String>,

    /// Disable progress bars
    #[arg(long, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    // Network & Security
    /// Custom User-Agent header
    #[arg(long, value_name = "AGENT", help_heading = "Network & Security")]
    pub user_agent: Option<String>,

    /// HTTP/HTTPS proxy URL
    #[arg(long, value_name = "URL", help_heading = "Network & Security")]
    pub proxy: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, help_heading = "Network & Security")]
    pub insecure: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

/// Map parsed arguments onto the config overrides they carry.
///
/// Range checks happen when the merged config is validated.
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        workers: cli.workers,
        connect_timeout_ms: cli.connect_timeout,
        read_timeout_ms: cli.read_timeout,
        retries: cli.retries,
        backoff_factor_ms: cli.backoff,
        prefer_get: cli.prefer_get,
        no_redirects: cli.no_redirects,
        user_agent: cli.user_agent.clone(),
        proxy: cli.proxy.clone(),
        insecure: cli.insecure,
        exclude_patterns: if cli.exclude_pattern.is_empty() {
            None
        } else {
            Some(cli.exclude_pattern.clone())
        },
        failure_threshold: cli.failure_threshold,
        quiet: cli.quiet,
        verbose: cli.verbose,
        output_format: cli.format.clone(),
        output_file: cli.output.clone(),
        no_progress: cli.no_progress,
        config_file: cli.config.clone(),
        no_config: cli.no_config,
    }
}
