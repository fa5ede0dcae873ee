//! # devdocs - Apple and Swift developer documentation scrapers
//!
//! This crate collects documentation pages and code samples from
//! developer.apple.com and docs.swift.org and writes them as flat text or CSV
//! files, ready to be loaded into a knowledge base.
//!
//! ## Features
//!
//! - Browser-rendered page fetching over the Chrome DevTools Protocol
//! - Bounded worker pool with one reusable browser session per worker
//! - Breadth-first link discovery scoped to a documentation root
//! - Field extraction for framework reference pages, WWDC sessions, sample
//!   projects and the Swift book
//! - Sample project archive download with source header parsing
//! - Text and CSV export, with per-framework files merged into one
//!
//! ## Example
//!
//! ```rust,no_run
//! use devdocs::crawler::{ChromeFactory, CrawlerConfig};
//! use devdocs::jobs::{SwiftBookOptions, run_swift_book};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CrawlerConfig::builder().max_workers(5).max_pages(20).build();
//!     let factory = ChromeFactory::new(config.clone());
//!
//!     let summary = run_swift_book(factory, &config, &SwiftBookOptions::default()).await?;
//!     println!("Wrote {} pages to {:?}", summary.records, summary.files);
//!     Ok(())
//! }
//! ```

mod error;

pub mod crawler;
pub mod download;
pub mod extract;
pub mod jobs;
pub mod logging;
pub mod output;
pub mod records;

pub use error::{Error, Result};

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::crawler::{CrawlError, CrawlerConfig, Session, SessionFactory};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::output::{OutputConfig, OutputFormat};
    pub use crate::records::{CodeSampleRecord, PageRecord, Record, SwiftDocRecord};
}
