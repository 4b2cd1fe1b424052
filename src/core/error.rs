use std::fmt;

/// Error types for urlpulse operations.
///
/// Network failures of individual probes are never represented here; those
/// are classified into [`crate::ProbeStatus`] values. This type covers the
/// precondition and I/O failures that happen around a run.
#[derive(Debug)]
pub enum UrlPulseError {
    /// IO error (reading URL lists, writing exports, etc.)
    Io(std::io::Error),

    /// Configuration error, raised before any work is dispatched
    Config(String),

    /// HTTP client error (building the client, fetching a remote list)
    Http(reqwest::Error),

    /// A URL list source could not be used
    Source(String),

    /// Regex compilation error
    Regex(regex::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// JSON serialization error
    Serialization(serde_json::Error),

    /// CSV export error
    Csv(csv::Error),

    /// Invalid argument error
    InvalidArgument(String),
}

impl fmt::Display for UrlPulseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlPulseError::Io(err) => write!(f, "IO error: {err}"),
            UrlPulseError::Config(msg) => write!(f, "Configuration error: {msg}"),
            UrlPulseError::Http(err) => write!(f, "HTTP error: {err}"),
            UrlPulseError::Source(msg) => write!(f, "Source error: {msg}"),
            UrlPulseError::Regex(err) => write!(f, "Regex error: {err}"),
            UrlPulseError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            UrlPulseError::Serialization(err) => write!(f, "Serialization error: {err}"),
            UrlPulseError::Csv(err) => write!(f, "CSV error: {err}"),
            UrlPulseError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for UrlPulseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UrlPulseError::Io(err) => Some(err),
            UrlPulseError::Http(err) => Some(err),
            UrlPulseError::Regex(err) => Some(err),
            UrlPulseError::TomlParsing(err) => Some(err),
            UrlPulseError::Serialization(err) => Some(err),
            UrlPulseError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UrlPulseError {
    fn from(err: std::io::Error) -> Self {
        UrlPulseError::Io(err)
    }
}

impl From<reqwest::Error> for UrlPulseError {
    fn from(err: reqwest::Error) -> Self {
        UrlPulseError::Http(err)
    }
}

impl From<regex::Error> for UrlPulseError {
    fn from(err: regex::Error) -> Self {
        UrlPulseError::Regex(err)
    }
}

impl From<toml::de::Error> for UrlPulseError {
    fn from(err: toml::de::Error) -> Self {
        UrlPulseError::TomlParsing(err)
    }
}

impl From<serde_json::Error> for UrlPulseError {
    fn from(err: serde_json::Error) -> Self {
        UrlPulseError::Serialization(err)
    }
}

impl From<csv::Error> for UrlPulseError {
    fn from(err: csv::Error) -> Self {
        UrlPulseError::Csv(err)
    }
}

/// Type alias for Results using UrlPulseError
pub type Result<T> = std::result::Result<T, UrlPulseError>;
