//! # Crawler Module
//!
//! Everything between a seed URL and a rendered page: browser sessions, link
//! discovery, the crawl frontier and the bounded worker pool that ties them
//! together. Site-specific field extraction lives in [`crate::extract`].
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: headless mode, worker count, timeouts, page cap
//! - `Session` / `SessionFactory`: one browser instance per worker
//! - `Frontier`: deduplicating, optionally capped FIFO of URLs
//! - `WorkerPool`: runs fetch + extract jobs over a growing set of URLs

pub mod browser;
mod config;
mod error;
pub mod links;
pub mod pool;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::{ChromeFactory, ChromeSession, Session, SessionFactory};
pub use config::{CrawlerConfig, CrawlerConfigBuilder};
pub use error::CrawlError;
pub use links::Frontier;
pub use pool::{PoolReport, Step, WorkerPool};
