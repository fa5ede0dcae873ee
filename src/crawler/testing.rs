//! In-memory browser sessions for tests

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::crawler::browser::{Session, SessionFactory};
use crate::crawler::error::CrawlError;

#[derive(Debug, Clone)]
pub enum FakePage {
    Html(String),
    /// `main` never shows up
    Timeout,
}

impl FakePage {
    pub fn html(html: impl Into<String>) -> Self {
        Self::Html(html.into())
    }
}

#[derive(Debug, Default)]
pub struct SessionStats {
    opened: AtomicUsize,
    closed: AtomicUsize,
    fetches: AtomicUsize,
}

impl SessionStats {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

/// Serves canned pages keyed by URL; unknown URLs fail to navigate
#[derive(Debug, Clone)]
pub struct FakeFactory {
    pages: Arc<HashMap<String, FakePage>>,
    stats: Arc<SessionStats>,
    fail_open: bool,
}

impl FakeFactory {
    pub fn new<I, K>(pages: I) -> Self
    where
        I: IntoIterator<Item = (K, FakePage)>,
        K: Into<String>,
    {
        Self {
            pages: Arc::new(pages.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            stats: Arc::new(SessionStats::default()),
            fail_open: false,
        }
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn stats(&self) -> Arc<SessionStats> {
        Arc::clone(&self.stats)
    }
}

impl SessionFactory for FakeFactory {
    type Session = FakeSession;

    async fn open(&self) -> Result<FakeSession, CrawlError> {
        if self.fail_open {
            return Err(CrawlError::Browser("no browser available".to_string()));
        }
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakeSession {
            pages: Arc::clone(&self.pages),
            stats: Arc::clone(&self.stats),
        })
    }
}

pub struct FakeSession {
    pages: Arc<HashMap<String, FakePage>>,
    stats: Arc<SessionStats>,
}

impl Session for FakeSession {
    async fn fetch(&mut self, url: &str) -> Result<String, CrawlError> {
        self.stats.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.pages.get(url) {
            Some(FakePage::Html(html)) => Ok(html.clone()),
            Some(FakePage::Timeout) => Err(CrawlError::Timeout {
                url: url.to_string(),
                timeout: Duration::from_secs(30),
            }),
            None => Err(CrawlError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }),
        }
    }

    async fn close(self) {
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Collects formatted log lines written on the current thread
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route this thread's events here until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Lines logged at `level` (`"WARN"`, `"ERROR"`, ...)
    pub fn lines(&self, level: &str) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        let marker = format!(" {level} ");
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(&marker))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
