use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use crate::core::types::Summary;
use crate::probing::scheduler::ProgressSink;
use crate::reporting::logging::log_warning;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.yellow/red}] {pos}/{len} URLs checked ({eta})";

/// Terminal progress bar fed by the scheduler's completion callback.
pub struct ProgressReporter {
    multi_progress: Arc<MultiProgress>,
    probe_progress: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: Arc::new(MultiProgress::new()),
            probe_progress: None,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn start_run(&mut self, total_urls: usize) {
        if !self.enabled {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = self.multi_progress.add(ProgressBar::new(total_urls as u64));
        pb.set_style(style);
        pb.set_message("Checking URLs");
        pb.enable_steady_tick(Duration::from_millis(120));
        self.probe_progress = Some(pb);
    }

    pub fn update(&self, completed: usize) {
        if let Some(ref pb) = self.probe_progress {
            pb.set_position(completed as u64);
        }
    }

    pub fn finish_run(&self, summary: &Summary) {
        if let Some(ref pb) = self.probe_progress {
            let message = if summary.not_working_count == 0 {
                "✓ All URLs working".to_string()
            } else {
                format!(
                    "✓ Check complete ({}/{} working)",
                    summary.working_count,
                    summary.total()
                )
            };
            pb.finish_with_message(message);
        }
    }

    pub fn finish_and_clear(&self) {
        if self.enabled {
            self.multi_progress.clear().unwrap_or(());
        }
    }

    /// Print a warning above the bar while it is drawn, else through the logger.
    pub fn log_warning(&self, message: &str) {
        if self.probe_progress.is_some() {
            self.multi_progress
                .println(format!("⚠ {message}"))
                .unwrap_or(());
        } else {
            log_warning(message);
        }
    }
}

impl ProgressSink for ProgressReporter {
    fn on_progress(&self, completed: usize, _total: usize) {
        self.update(completed);
    }
}
