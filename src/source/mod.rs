//! URL list sources
//!
//! Reads URL lists from files, stdin or remote text files and turns them
//! into the ordered list of raw URL strings handed to the probe engine.

pub mod reader;

use log::{debug, warn};
use std::io::Read;
use std::time::Duration;

use crate::core::error::{Result, UrlPulseError};

// Re-export commonly used items
pub use reader::{UrlSource, apply_exclude_patterns, looks_like_html, read_url_list};

/// Download a remote URL list with a plain GET; a non-2xx response is an error.
pub async fn fetch_remote_list(url: &str, timeout: Duration, user_agent: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(UrlPulseError::Source(format!(
            "Could not fetch URL list from '{url}': HTTP {}",
            status.as_u16()
        )));
    }

    let text = response.text().await?;
    if looks_like_html(&text) {
        warn!("'{url}' looks like an HTML page, not a raw URL list");
    }
    Ok(text)
}

/// Read the URLs of one input.
///
/// Stdin and local files are read on the blocking thread pool.
pub async fn load_source(
    source: &UrlSource,
    fetch_timeout: Duration,
    user_agent: &str,
) -> Result<Vec<String>> {
    let text = match source {
        UrlSource::Stdin => {
            read_blocking(|| {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                Ok(buffer)
            })
            .await?
        }
        UrlSource::File(path) => {
            let path = path.clone();
            read_blocking(move || {
                std::fs::read_to_string(&path).map_err(|e| {
                    UrlPulseError::Source(format!("Could not read '{}': {e}", path.display()))
                })
            })
            .await?
        }
        UrlSource::Remote(url) => fetch_remote_list(url, fetch_timeout, user_agent).await?,
    };

    let urls = read_url_list(&text);
    debug!("{source:?}: {} URL(s)", urls.len());
    Ok(urls)
}

async fn read_blocking<F>(read: F) -> Result<String>
where
    F: FnOnce() -> Result<String> + Send + 'static,
{
    tokio::task::spawn_blocking(read)
        .await
        .map_err(|e| UrlPulseError::Io(std::io::Error::other(e)))?
}

/// Read every input in order and concatenate their URLs.
pub async fn load_urls(
    inputs: &[String],
    fetch_timeout: Duration,
    user_agent: &str,
) -> Result<Vec<String>> {
    if inputs.is_empty() {
        return Err(UrlPulseError::InvalidArgument(
            "No input given. Pass a file path, '-' for stdin, or a URL of a remote list."
                .to_string(),
        ));
    }

    let mut urls = Vec::new();
    for input in inputs {
        let source = UrlSource::parse(input);
        urls.extend(load_source(&source, fetch_timeout, user_agent).await?);
    }
    Ok(urls)
}
