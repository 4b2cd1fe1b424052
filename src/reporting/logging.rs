use crate::core::types::{ProbeConfig, ProbeResult, Summary};
use log::{debug, error, info, warn};

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    // try_init so tests and embedders can call this more than once
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log probe configuration information
pub fn log_config_info(config: &ProbeConfig) {
    info!(
        "Configuration: workers={}, connect_timeout={}ms, read_timeout={}ms",
        config.worker_count(),
        config.connect_timeout().as_millis(),
        config.read_timeout().as_millis()
    );
    info!(
        "Retry: retries={}, backoff_factor={}ms",
        config.max_retries(),
        config.backoff_factor().as_millis()
    );
    info!(
        "HTTP: prefer_get={}, follow_redirects={} (max {}), insecure={}, proxy={}",
        config.prefer_get(),
        config.follow_redirects(),
        config.max_redirects(),
        config.insecure(),
        config.proxy().unwrap_or("none")
    );
    debug!("User-Agent: {}", config.user_agent());
}

/// Log where URLs were read from
pub fn log_source_info(inputs: &[String], url_count: usize, excluded: usize) {
    info!("Read {url_count} URL(s) from {} input(s)", inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        debug!("  {}. {}", i + 1, input);
    }
    if excluded > 0 {
        info!("Excluded {excluded} URL(s) matching exclude patterns");
    }
}

/// Log the start of a run
pub fn log_run_start(url_count: usize, workers: usize) {
    info!("Starting probe of {url_count} URLs with {workers} workers");
}

/// Log run completion
pub fn log_run_complete(summary: &Summary, duration_ms: u128) {
    if summary.not_working_count == 0 {
        info!(
            "✅ Probe complete: {}/{} URLs working ({}ms)",
            summary.working_count,
            summary.total(),
            duration_ms
        );
    } else {
        warn!(
            "❌ Probe complete: {}/{} URLs working, {} not working ({}ms)",
            summary.working_count,
            summary.total(),
            summary.not_working_count,
            duration_ms
        );
    }
}

/// Log an individual probe result for debugging
pub fn log_probe_result(result: &ProbeResult) {
    if result.is_working() {
        debug!("✓ {} -> {}", result.url(), result.status_code());
    } else {
        debug!(
            "✗ {} -> {} ({})",
            result.url(),
            result.status_code(),
            result.status().label()
        );
    }
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
