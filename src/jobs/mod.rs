//! # Jobs
//!
//! The three batch scrapers. Each job seeds a [`WorkerPool`](crate::crawler::WorkerPool),
//! turns the rendered pages into records and writes them with
//! [`output`](crate::output). Jobs are generic over the
//! [`SessionFactory`](crate::crawler::SessionFactory) so they run against a
//! real browser in the binary and against in-memory pages in tests.

pub mod docs;
pub mod samples;
pub mod swift_book;

use std::path::PathBuf;
use std::time::Duration;

pub use docs::{DocsOptions, run_docs};
pub use samples::{SamplesOptions, run_samples};
pub use swift_book::{SwiftBookOptions, run_swift_book};

/// What a job left behind
#[derive(Debug, Default)]
pub struct JobSummary {
    /// Records written across all files
    pub records: usize,

    /// Pages or frameworks skipped after a failure
    pub skipped: usize,

    /// Files written, in write order
    pub files: Vec<PathBuf>,

    pub elapsed: Duration,
}
