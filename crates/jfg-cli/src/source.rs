//! Reading the document under test from a path or an http(s) URL.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use url::Url;

/// Largest document accepted from a URL.
pub const MAX_DOCUMENT_BYTES: u64 = 256 * 1024 * 1024;

/// The document could not be obtained.
#[derive(Debug, thiserror::Error)]
#[error("source unavailable: {location}: {reason}")]
pub struct SourceUnavailable {
    /// Path or URL as given.
    pub location: String,
    /// Underlying error.
    pub reason: String,
}

impl SourceUnavailable {
    fn new(location: &str, reason: impl ToString) -> Self {
        Self {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Parse `location` as a remote URL. Anything else is a local path.
pub fn remote_url(location: &str) -> Option<Url> {
    Url::parse(location)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Read the raw bytes at `location`.
pub fn read(location: &str, timeout: Duration) -> Result<Vec<u8>, SourceUnavailable> {
    match remote_url(location) {
        Some(url) => fetch(&url, timeout).map_err(|reason| SourceUnavailable::new(location, reason)),
        None => std::fs::read(Path::new(location)).map_err(|e| SourceUnavailable::new(location, e)),
    }
}

fn fetch(url: &Url, timeout: Duration) -> Result<Vec<u8>, String> {
    tracing::debug!(%url, "fetching document");
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| e.to_string())?;
    let response = client.get(url.clone()).send().map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }

    let mut body = Vec::new();
    response
        .take(MAX_DOCUMENT_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|e| e.to_string())?;
    if body.len() as u64 > MAX_DOCUMENT_BYTES {
        return Err(format!("document exceeds {MAX_DOCUMENT_BYTES} bytes"));
    }
    Ok(body)
}
