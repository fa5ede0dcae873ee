//! Error types for the devdocs crate

use thiserror::Error;

use crate::crawler::CrawlError;

/// Result type for devdocs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for devdocs operations
///
/// Everything here is fatal to a run. Per-page failures stay inside the
/// crawler as [`CrawlError`] and are logged and skipped there.
#[derive(Debug, Error)]
pub enum Error {
    /// Crawling could not proceed at all, e.g. no browser could be started
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Writing or reading an export file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular encoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<CrawlError> for Error {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Io(e) => Error::Io(e),
            _ => Error::Crawl(err.to_string()),
        }
    }
}
