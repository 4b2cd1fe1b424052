use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use crate::core::constants::source;

static REMOTE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("Failed to compile remote list pattern"));

/// Where one command-line input reads its URL list from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    Stdin,
    File(PathBuf),
    Remote(String),
}

impl UrlSource {
    /// `-` is stdin, an http(s) URL is a remote list, anything else a path.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed == source::STDIN {
            Self::Stdin
        } else if REMOTE_PATTERN.is_match(trimmed) {
            Self::Remote(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(input))
        }
    }
}

/// Split list text into URLs: one per line, trimmed, blank lines dropped.
pub fn read_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.replace('\r', ""))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether the first bytes of a fetched list look like an HTML page.
pub fn looks_like_html(text: &str) -> bool {
    let bytes = text.as_bytes();
    let head = &bytes[..bytes.len().min(source::HTML_SNIFF_BYTES)];
    head.windows(5).any(|w| w.eq_ignore_ascii_case(b"<html"))
}

/// Drop URLs that match any exclude pattern, returning the kept URLs and the excluded count.
pub fn apply_exclude_patterns(urls: Vec<String>, patterns: &[Regex]) -> (Vec<String>, usize) {
    if patterns.is_empty() {
        return (urls, 0);
    }
    let before = urls.len();
    let kept: Vec<String> = urls
        .into_iter()
        .filter(|url| !patterns.iter().any(|p| p.is_match(url)))
        .collect();
    let excluded = before - kept.len();
    (kept, excluded)
}
