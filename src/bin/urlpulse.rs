use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use urlpulse::config::{CliConfig, Config};
use urlpulse::core::constants::output_formats;
use urlpulse::probing::{ProgressSink, Scheduler, summarize};
use urlpulse::reporting::logging;
use urlpulse::source;
use urlpulse::ui::output;
use urlpulse::ui::{Cli, ProgressReporter, cli_to_config};
use urlpulse::Summary;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.inputs.is_empty() {
        eprintln!("Error: No inputs provided");
        eprintln!("\nFor more information, try '--help'.");
        std::process::exit(1);
    }

    match run_urlpulse_logic(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Main probing logic extracted from main() for testing
pub async fn run_urlpulse_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli);
    let config = load_and_merge_config(&cli_config)?;

    let output_settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(output_settings.verbose, output_settings.quiet);

    config.validate()?;
    let probe_config = config.probe_config()?;
    logging::log_config_info(&probe_config);

    // Read and filter the URL list
    let urls = source::load_urls(
        &cli.inputs,
        config.fetch_timeout_duration(),
        probe_config.user_agent(),
    )
    .await?;
    let total_read = urls.len();
    let patterns = config.compile_exclude_patterns()?;
    let (urls, excluded) = source::apply_exclude_patterns(urls, &patterns);
    logging::log_source_info(&cli.inputs, total_read, excluded);
    if urls.is_empty() {
        logging::log_warning("No URLs to check");
    }

    let scheduler = Scheduler::from_config(probe_config)?;
    let progress = Arc::new(create_progress_reporter(&output_settings, urls.len()));
    let sink: Arc<dyn ProgressSink> = progress.clone();
    cancel_on_interrupt(scheduler.cancellation_token(), Arc::clone(&progress));

    logging::log_run_start(urls.len(), scheduler.config().worker_count());
    let started = Instant::now();
    let results = scheduler.run(&urls, sink).await;
    let summary = summarize(&results);
    logging::log_run_complete(&summary, started.elapsed().as_millis());

    progress.finish_run(&summary);
    progress.finish_and_clear();

    if scheduler.cancellation_token().is_cancelled() {
        logging::log_warning("Run interrupted; URLs not yet checked are reported as Could Not Connect");
    }

    output::display_results(
        &results,
        &summary,
        &output_settings.output_format,
        output_settings.quiet,
        config.failure_threshold,
    )?;

    if let Some(ref path) = cli_config.output_file {
        output::write_csv_export(path, &results)?;
        if output_settings.should_show_export_info() {
            println!("📄 CSV report written: {path}");
        }
    }

    Ok(determine_exit_code(&summary, config.failure_threshold))
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

impl OutputSettings {
    pub fn should_show_export_info(&self) -> bool {
        !self.quiet && self.output_format == output_formats::TEXT
    }
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;
    let verbose = config.verbose.unwrap_or(false);
    let output_format = config.output_format().to_string();
    let show_progress =
        !quiet && !cli_config.no_progress && output_format == output_formats::TEXT;

    OutputSettings {
        quiet,
        verbose,
        output_format,
        show_progress,
    }
}

/// Create the progress bar for a run of `total_urls` URLs
pub fn create_progress_reporter(output_settings: &OutputSettings, total_urls: usize) -> ProgressReporter {
    let mut reporter = ProgressReporter::new(output_settings.show_progress);
    reporter.start_run(total_urls);
    reporter
}

/// Stop dispatching new probes on Ctrl-C; in-flight probes finish normally
fn cancel_on_interrupt(token: CancellationToken, progress: Arc<ProgressReporter>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            progress.log_warning("Interrupt received, finishing in-flight checks");
            token.cancel();
        }
    });
}

/// Determine exit code based on failure threshold
pub fn determine_exit_code(summary: &Summary, failure_threshold: Option<f64>) -> i32 {
    let should_fail = match failure_threshold {
        Some(threshold) => summary.failure_rate() > threshold,
        None => summary.not_working_count > 0, // Fail on any URL that is not working
    };

    if should_fail { 1 } else { 0 }
}
