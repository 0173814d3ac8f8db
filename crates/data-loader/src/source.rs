//! Where a table comes from: a remote URL or a local file.
//!
//! Both kinds are read whole into memory. Any failure becomes
//! `DataLoadError::DataUnavailable`; nothing is retried.

use crate::error::{DataLoadError, Result};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// A table location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Fetched over HTTP(S) with a blocking client
    Url(String),
    /// Read from the local filesystem
    Path(PathBuf),
}

impl DataSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Url(_))
    }

    /// Read the whole source as text
    ///
    /// `timeout` bounds remote fetches only.
    pub fn fetch_text(&self, timeout: Duration) -> Result<String> {
        match self {
            DataSource::Url(url) => fetch_url(url, timeout),
            DataSource::Path(path) => read_file(path),
        }
    }
}

impl FromStr for DataSource {
    type Err = Infallible;

    /// Anything starting with `http://` or `https://` is a URL, the rest is a path
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(DataSource::Url(trimmed.to_string()))
        } else {
            Ok(DataSource::Path(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

fn unavailable(location: impl fmt::Display, reason: impl fmt::Display) -> DataLoadError {
    DataLoadError::DataUnavailable {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

fn fetch_url(url: &str, timeout: Duration) -> Result<String> {
    debug!("Fetching {} (timeout {:?})", url, timeout);

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| unavailable(url, e))?;

    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| unavailable(url, e))?;

    response.text().map_err(|e| unavailable(url, e))
}

/// Read a local file, replacing invalid UTF-8 rather than failing on it
fn read_file(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => unavailable(path.display(), "file not found"),
        _ => unavailable(path.display(), e),
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
