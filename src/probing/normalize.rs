//! Cleaning of raw input strings before they are probed.

use once_cell::sync::Lazy;
use regex::Regex;

const DEFAULT_SCHEME: &str = "https://";

static SCHEME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("Failed to compile scheme regex pattern"));

/// Trim surrounding whitespace and drop every carriage return.
pub fn normalize(raw: &str) -> String {
    raw.trim().replace('\r', "")
}

/// Prepend `https://` unless the URL already starts with `http://` or `https://`.
///
/// Empty input stays empty.
pub fn ensure_scheme(url: &str) -> String {
    if url.is_empty() || SCHEME_PATTERN.is_match(url) {
        url.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{url}")
    }
}

/// `normalize` followed by `ensure_scheme`.
pub fn prepare(raw: &str) -> String {
    ensure_scheme(&normalize(raw))
}
