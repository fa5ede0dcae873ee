//! Error types for the crawler module

use std::time::Duration;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The `main` element did not appear in time
    #[error("Timed out after {}s waiting for {url}", .timeout.as_secs())]
    Timeout { url: String, timeout: Duration },

    /// Navigation to the page failed
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// Browser process could not be launched or talked to
    #[error("Browser error: {0}")]
    Browser(String),

    /// A required element was missing from the rendered page
    #[error("Missing element '{selector}' on {url}")]
    MissingElement { url: String, selector: String },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Download returned a non-success status
    #[error("Download of {url} failed with status {status}")]
    Download { url: String, status: u16 },

    /// Downloaded archive could not be unpacked
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<chromiumoxide::error::CdpError> for CrawlError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(err.to_string())
    }
}

impl From<tokio::task::JoinError> for CrawlError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Other(format!("Task join error: {}", err))
    }
}
