//! ANSI color helpers for terminal output

use std::io::IsTerminal;

use crate::core::types::ProbeStatus;

pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";

    pub const CYAN: &'static str = "\x1b[36m";
    pub const WHITE: &'static str = "\x1b[37m";

    pub const BRIGHT_RED: &'static str = "\x1b[91m";
    pub const BRIGHT_GREEN: &'static str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &'static str = "\x1b[93m";
    pub const BRIGHT_MAGENTA: &'static str = "\x1b[95m";
    pub const BRIGHT_CYAN: &'static str = "\x1b[96m";
}

/// Apply color to text if terminal supports it
pub fn colorize(text: &str, color: &str) -> String {
    if supports_formatting() {
        format!("{}{}{}", color, text, Colors::RESET)
    } else {
        text.to_string()
    }
}

/// Bold and colored, used for headings
pub fn heading(text: &str, color: &str) -> String {
    if supports_formatting() {
        format!("{}{}{}{}", Colors::BOLD, color, text, Colors::RESET)
    } else {
        text.to_string()
    }
}

/// Color that matches a probe outcome
pub fn status_color(status: ProbeStatus) -> &'static str {
    match status {
        ProbeStatus::Working => Colors::BRIGHT_GREEN,
        ProbeStatus::NotWorking(code) if (500..600).contains(&code) => Colors::BRIGHT_MAGENTA,
        ProbeStatus::NotWorking(_) => Colors::BRIGHT_RED,
        ProbeStatus::CouldNotConnect => Colors::BRIGHT_YELLOW,
        ProbeStatus::EmptyUrl => Colors::DIM,
    }
}

/// Check if the current environment supports ANSI colors and emojis
pub fn supports_formatting() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Disable formatting when running tests
    if cfg!(test) {
        return false;
    }

    if !std::io::stdout().is_terminal() {
        return false;
    }

    match std::env::var("TERM") {
        Ok(term) => !(term == "dumb" || term.is_empty()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_is_plain_under_test() {
        assert_eq!(colorize("test", Colors::BRIGHT_RED), "test");
        assert_eq!(heading("Issues", Colors::BRIGHT_RED), "Issues");
    }

    #[test]
    fn test_status_color() {
        assert_eq!(status_color(ProbeStatus::Working), Colors::BRIGHT_GREEN);
        assert_eq!(status_color(ProbeStatus::NotWorking(404)), Colors::BRIGHT_RED);
        assert_eq!(status_color(ProbeStatus::NotWorking(503)), Colors::BRIGHT_MAGENTA);
        assert_eq!(status_color(ProbeStatus::CouldNotConnect), Colors::BRIGHT_YELLOW);
        assert_eq!(status_color(ProbeStatus::EmptyUrl), Colors::DIM);
    }

    #[test]
    fn test_supports_formatting_disabled_in_tests() {
        assert!(!supports_formatting());
    }
}
