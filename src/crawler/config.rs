//! # Crawler Configuration Module
//!
//! Runtime knobs shared by every scraping job: browser mode, worker count,
//! page and download timeouts, and the page cap. Built with a builder so the
//! CLI layer and tests can override only what they care about.

use std::time::Duration;

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Run the browser without a visible window
    pub headless: bool,

    /// Maximum number of concurrent browser sessions
    pub max_workers: usize,

    /// Seconds to wait for a page's `main` element
    pub timeout_secs: u64,

    /// Seconds to wait for a sample project download
    pub download_timeout_secs: u64,

    /// Maximum number of pages to crawl, 0 for unlimited
    pub max_pages: usize,

    /// Milliseconds between polls for the `main` element
    pub poll_interval_ms: u64,

    /// User agent for plain HTTP downloads
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            headless: true,
            max_workers: 4,
            timeout_secs: 30,
            download_timeout_secs: 120,
            max_pages: 0,
            poll_interval_ms: 250,
            user_agent: format!("devdocs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set whether the browser runs headless
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set the maximum number of concurrent browser sessions
    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.config.max_workers = max_workers;
        self
    }

    /// Set the page load timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Set the download timeout in seconds
    pub fn download_timeout_secs(mut self, download_timeout_secs: u64) -> Self {
        self.config.download_timeout_secs = download_timeout_secs;
        self
    }

    /// Set the maximum number of pages to crawl (0 for unlimited)
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the poll interval used while waiting for the `main` element
    pub fn poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.config.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the user agent to use for downloads
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Page load timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Download timeout as a Duration
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Worker count, never below one
    pub fn workers(&self) -> usize {
        self.max_workers.max(1)
    }
}
