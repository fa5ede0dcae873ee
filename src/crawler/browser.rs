//! Browser sessions for fetching rendered pages
//!
//! Documentation pages on developer.apple.com and docs.swift.org are rendered
//! client side, so every fetch goes through a real browser. A [`Session`] owns
//! one browser process; a [`SessionFactory`] opens them for the worker pool.

use std::future::Future;
use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{debug, instrument, warn};

use crate::crawler::CrawlerConfig;
use crate::crawler::error::CrawlError;

/// Element whose presence marks a page as rendered
pub const MAIN_SELECTOR: &str = "main";

/// One browser instance, used by one worker at a time
pub trait Session: Send + 'static {
    /// Navigate to `url`, wait for the main element and return the rendered HTML
    fn fetch(&mut self, url: &str) -> impl Future<Output = Result<String, CrawlError>> + Send;

    /// Release the browser process
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Opens browser sessions on demand
pub trait SessionFactory: Send + Sync + 'static {
    type Session: Session;

    fn open(&self) -> impl Future<Output = Result<Self::Session, CrawlError>> + Send;
}

/// Launches headless (or headed) Chromium instances over CDP
#[derive(Debug, Clone)]
pub struct ChromeFactory {
    config: CrawlerConfig,
}

impl ChromeFactory {
    pub fn new(config: CrawlerConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self) -> Result<BrowserConfig, CrawlError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .request_timeout(self.config.timeout());
        if !self.config.headless {
            builder = builder.with_head();
        }
        builder.build().map_err(CrawlError::Browser)
    }
}

impl SessionFactory for ChromeFactory {
    type Session = ChromeSession;

    async fn open(&self) -> Result<ChromeSession, CrawlError> {
        let (browser, mut handler) = Browser::launch(self.browser_config()?).await?;

        // The CDP connection only makes progress while its handler is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        debug!("Launched browser session");
        Ok(ChromeSession {
            browser,
            handler,
            timeout: self.config.timeout(),
            poll_interval: self.config.poll_interval(),
        })
    }
}

/// A live Chromium process plus its CDP event loop
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    timeout: Duration,
    poll_interval: Duration,
}

impl ChromeSession {
    fn timed_out(&self, url: &str) -> CrawlError {
        CrawlError::Timeout {
            url: url.to_string(),
            timeout: self.timeout,
        }
    }

    /// Navigate an open tab to `url` and return its HTML once `<main>` exists
    async fn load(&self, page: &Page, url: &str, deadline: Instant) -> Result<String, CrawlError> {
        timeout_at(deadline, page.goto(url))
            .await
            .map_err(|_| self.timed_out(url))?
            .map_err(|e| CrawlError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        self.wait_for_main(page, url, deadline).await?;

        timeout_at(deadline, page.content())
            .await
            .map_err(|_| self.timed_out(url))?
            .map_err(CrawlError::from)
    }

    async fn wait_for_main(&self, page: &Page, url: &str, deadline: Instant) -> Result<(), CrawlError> {
        loop {
            match timeout_at(deadline, page.find_element(MAIN_SELECTOR)).await {
                Ok(Ok(_)) => return Ok(()),
                Ok(Err(_)) => {}
                Err(_) => return Err(self.timed_out(url)),
            }
            if Instant::now() >= deadline {
                return Err(self.timed_out(url));
            }
            sleep_until(next_poll(Instant::now(), self.poll_interval, deadline)).await;
        }
    }
}

/// When to poll again, never later than the deadline
fn next_poll(now: Instant, poll_interval: Duration, deadline: Instant) -> Instant {
    (now + poll_interval).min(deadline)
}

impl Session for ChromeSession {
    #[instrument(skip(self))]
    async fn fetch(&mut self, url: &str) -> Result<String, CrawlError> {
        let deadline = Instant::now() + self.timeout;

        // The tab is opened blank so a slow navigation still leaves a handle to close.
        let page = timeout_at(deadline, self.browser.new_page("about:blank"))
            .await
            .map_err(|_| self.timed_out(url))?
            .map_err(|e| CrawlError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let html = self.load(&page, url, deadline).await;

        if let Err(e) = page.close().await {
            debug!("Failed to close tab for {}: {}", url, e);
        }
        html
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        debug!("Closed browser session");
    }
}
