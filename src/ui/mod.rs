//! User interface
//!
//! This module contains the components that face the terminal: CLI
//! parsing, colors, output formatting and export, and progress reporting.

pub mod cli;
pub mod color;
pub mod output;
pub mod progress;

// Re-export commonly used items
pub use cli::{Cli, cli_to_config};
pub use output::{display_results, write_csv_export};
pub use progress::ProgressReporter;
