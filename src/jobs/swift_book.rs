//! The Swift Programming Language book crawl
//!
//! Starts at the book root and follows every link that stays under it. Pages
//! are exported in the order they were discovered, which follows the book's
//! table of contents.

use std::time::Instant;

use tracing::{error, info, instrument};

use crate::crawler::links::scoped_links;
use crate::crawler::pool::progress_bar;
use crate::crawler::{CrawlError, CrawlerConfig, Session, SessionFactory, Step, WorkerPool};
use crate::error::Result;
use crate::extract::extract_swift_page;
use crate::jobs::JobSummary;
use crate::output::{OutputConfig, write_records};
use crate::records::SwiftDocRecord;

/// Root of the book on docs.swift.org
pub const SWIFT_BOOK_URL: &str =
    "https://docs.swift.org/swift-book/documentation/the-swift-programming-language";

#[derive(Debug, Clone)]
pub struct SwiftBookOptions {
    pub base_url: String,
    pub output: OutputConfig,
}

impl Default for SwiftBookOptions {
    fn default() -> Self {
        Self {
            base_url: SWIFT_BOOK_URL.to_string(),
            output: OutputConfig::new(".", "swift_documentation", Default::default()),
        }
    }
}

/// Crawl the book and write one record per page
#[instrument(skip_all, fields(base_url = %options.base_url))]
pub async fn run_swift_book<F: SessionFactory>(
    factory: F,
    config: &CrawlerConfig,
    options: &SwiftBookOptions,
) -> Result<JobSummary> {
    let started = Instant::now();
    let base = options.base_url.trim_end_matches('/').to_string();
    info!("Crawling the Swift book from {}", base);

    let pool = WorkerPool::new(factory, config.workers())
        .max_items(config.max_pages)
        .progress(progress_bar(1, "pages"));
    let scope = base.clone();
    let report = pool
        .run([base], move |mut session: F::Session, url: String| {
            let scope = scope.clone();
            async move {
                let result = visit(&mut session, &url, &scope).await;
                (session, result)
            }
        })
        .await?;

    let path = options.output.path();
    write_records(&path, &report.outputs, options.output.format)
        .inspect_err(|e| error!("Failed to write {}: {}", path.display(), e))?;

    let summary = JobSummary {
        records: report.outputs.len(),
        skipped: report.failed,
        files: vec![path],
        elapsed: started.elapsed(),
    };
    info!(
        "Swift book crawl finished in {:.2?}: {} pages, {} skipped",
        summary.elapsed, summary.records, summary.skipped
    );
    Ok(summary)
}

async fn visit<S: Session>(
    session: &mut S,
    url: &str,
    scope: &str,
) -> std::result::Result<Step<String, SwiftDocRecord>, CrawlError> {
    let html = session.fetch(url).await?;
    let record = extract_swift_page(&html, url)?;
    let links = scoped_links(&html, url, scope)?;
    Ok(Step::new(vec![record]).with_follow_up(links))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::{FakeFactory, FakePage, LogCapture};
    use crate::output::OutputFormat;
    use std::fs;
    use tempfile::tempdir;

    fn book() -> FakeFactory {
        let page = |title: &str, links: &str| FakePage::html(format!("<main><h1>{title}</h1>{links}</main>"));
        FakeFactory::new([
            (
                SWIFT_BOOK_URL.to_string(),
                page(
                    "The Swift Programming Language",
                    r#"<a href="the-swift-programming-language/thebasics">Basics</a>
                       <a href="the-swift-programming-language/closures">Closures</a>
                       <a href="https://www.swift.org/">swift.org</a>"#,
                ),
            ),
            (
                format!("{SWIFT_BOOK_URL}/thebasics"),
                page("The Basics", r#"<a href="closures">Closures</a><a href="thebasics#constants">Constants</a>"#),
            ),
            (format!("{SWIFT_BOOK_URL}/closures"), FakePage::Timeout),
        ])
    }

    fn options(dir: &std::path::Path, format: OutputFormat) -> SwiftBookOptions {
        SwiftBookOptions {
            output: OutputConfig::new(dir, "swift_documentation", format),
            ..SwiftBookOptions::default()
        }
    }

    #[tokio::test]
    async fn test_crawl_book() {
        let dir = tempdir().unwrap();

        let summary = run_swift_book(book(), &CrawlerConfig::default(), &options(dir.path(), OutputFormat::Txt))
            .await
            .unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.skipped, 1);
        let text = fs::read_to_string(dir.path().join("swift_documentation.txt")).unwrap();
        let urls: Vec<_> = text.lines().filter_map(|l| l.strip_prefix("URL: ")).collect();
        assert_eq!(urls, vec![SWIFT_BOOK_URL.to_string(), format!("{SWIFT_BOOK_URL}/thebasics")]);
        assert!(text.contains("The Basics"));
    }

    #[tokio::test]
    async fn test_max_pages() {
        let dir = tempdir().unwrap();
        let config = CrawlerConfig::builder().max_pages(1).build();

        let summary = run_swift_book(book(), &config, &options(dir.path(), OutputFormat::Csv))
            .await
            .unwrap();

        assert_eq!(summary.records, 1);
        let mut reader = csv::Reader::from_path(dir.path().join("swift_documentation.csv")).unwrap();
        assert_eq!(reader.records().count(), 1);
    }

    #[tokio::test]
    async fn test_unwritable_output_is_logged() {
        let dir = tempdir().unwrap();
        let taken = dir.path().join("taken");
        fs::write(&taken, "not a directory").unwrap();
        let logs = LogCapture::default();
        let _guard = logs.install();

        let result = run_swift_book(book(), &CrawlerConfig::default(), &options(&taken, OutputFormat::Txt)).await;

        assert!(result.is_err());
        let errors = logs.lines("ERROR");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Failed to write"));
        assert!(errors[0].contains("swift_documentation.txt"));
    }
}
