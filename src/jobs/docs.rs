//! Apple framework documentation crawl
//!
//! Pool items are framework roots. Each worker crawls its framework breadth
//! first with its own browser session, following `/documentation` links that
//! stay under the root, and returns the framework's pages. Once the pool
//! drains every framework is written to `<dir>/<framework>.<ext>` and the
//! files are merged into one export.

use std::time::Instant;

use tracing::{error, info, instrument, warn};

use crate::crawler::links::{documentation_links, framework_name, normalize_seeds};
use crate::crawler::pool::progress_bar;
use crate::crawler::{CrawlError, CrawlerConfig, Frontier, Session, SessionFactory, Step, WorkerPool};
use crate::error::Result;
use crate::extract::extract_page;
use crate::jobs::JobSummary;
use crate::output::{OutputConfig, merge_files, write_records};
use crate::records::PageRecord;

/// Framework roots crawled when none are given
pub const FRAMEWORKS: &[&str] = &[
    "https://developer.apple.com/documentation/avfoundation",
    "https://developer.apple.com/documentation/shadergraph",
    "https://developer.apple.com/documentation/visionos/",
    "https://developer.apple.com/documentation/TabletopKit",
    "https://developer.apple.com/documentation/AVKit",
    "https://developer.apple.com/documentation/Xcode",
    "https://developer.apple.com/documentation/healthkit",
    "https://developer.apple.com/documentation/spatial",
    "https://developer.apple.com/documentation/mapkit",
    "https://developer.apple.com/documentation/GroupActivities",
    "https://developer.apple.com/documentation/metal",
    "https://developer.apple.com/documentation/realitykit",
    "https://developer.apple.com/documentation/arkit",
    "https://developer.apple.com/documentation/cloudkit",
    "https://developer.apple.com/documentation/visionos-release-notes",
    "https://developer.apple.com/documentation/Xcode-Release-Notes",
    "https://developer.apple.com/documentation/symbols",
    "https://developer.apple.com/documentation/Accessibility",
    "https://developer.apple.com/documentation/AppIntents",
    "https://developer.apple.com/documentation/swiftui",
    "https://developer.apple.com/documentation/uikit",
];

/// Options for the documentation crawl
#[derive(Debug, Clone)]
pub struct DocsOptions {
    /// Framework root URLs; normalized and deduplicated before crawling
    pub frameworks: Vec<String>,

    /// Per-framework files go in `output.dir`; the merged export is `output.name`
    pub output: OutputConfig,

    /// Merge the per-framework files after the crawl
    pub merge: bool,
}

/// Pages of one framework
#[derive(Debug)]
struct FrameworkPages {
    framework: String,
    records: Vec<PageRecord>,
    skipped: usize,
}

/// Crawl every framework and write its pages
#[instrument(skip_all, fields(frameworks = options.frameworks.len()))]
pub async fn run_docs<F: SessionFactory>(
    factory: F,
    config: &CrawlerConfig,
    options: &DocsOptions,
) -> Result<JobSummary> {
    let started = Instant::now();
    let roots = normalize_seeds(&options.frameworks);
    info!("Crawling {} frameworks with {} workers", roots.len(), config.workers());

    let max_pages = config.max_pages;
    let pool = WorkerPool::new(factory, config.workers()).progress(progress_bar(0, "frameworks"));
    let report = pool
        .run(roots, move |mut session: F::Session, root: String| async move {
            let result = crawl_framework(&mut session, &root, max_pages)
                .await
                .map(|pages| Step::new(vec![pages]));
            (session, result)
        })
        .await?;

    let mut summary = JobSummary {
        skipped: report.failed,
        ..JobSummary::default()
    };
    for pages in &report.outputs {
        let path = options.output.file(&pages.framework);
        write_records(&path, &pages.records, options.output.format)
            .inspect_err(|e| error!("Failed to write {}: {}", path.display(), e))?;
        info!(
            "Framework {}: {} pages, {} skipped",
            pages.framework,
            pages.records.len(),
            pages.skipped
        );
        summary.records += pages.records.len();
        summary.skipped += pages.skipped;
        summary.files.push(path);
    }

    if options.merge {
        let mut inputs = summary.files.clone();
        inputs.sort();
        let merged = options.output.path();
        let merged_records = merge_files(&inputs, &merged, options.output.format)
            .inspect_err(|e| error!("Failed to merge into {}: {}", merged.display(), e))?;
        if merged_records > 0 {
            summary.files.push(merged);
        }
    }

    summary.elapsed = started.elapsed();
    info!(
        "Documentation crawl finished in {:.2?}: {} records, {} skipped",
        summary.elapsed, summary.records, summary.skipped
    );
    Ok(summary)
}

/// Breadth-first crawl of one framework with a single session
///
/// Failing to load the root page fails the framework; any other page is
/// logged and skipped.
async fn crawl_framework<S: Session>(
    session: &mut S,
    root: &str,
    max_pages: usize,
) -> std::result::Result<FrameworkPages, CrawlError> {
    let framework =
        framework_name(root).ok_or_else(|| CrawlError::Other(format!("Not a framework URL: {}", root)))?;
    info!("Crawling framework {} from {}", framework, root);

    let mut frontier = Frontier::new(max_pages);
    frontier.push(root.to_string());
    let mut pages = FrameworkPages {
        framework,
        records: Vec::new(),
        skipped: 0,
    };

    while let Some(url) = frontier.pop() {
        match visit(session, &url, &pages.framework, root).await {
            Ok((record, links)) => {
                pages.records.push(record);
                frontier.extend(links);
            }
            Err(e) if url == root => return Err(e),
            Err(e) => {
                warn!("Skipping {}: {}", url, e);
                pages.skipped += 1;
            }
        }
    }
    Ok(pages)
}

async fn visit<S: Session>(
    session: &mut S,
    url: &str,
    framework: &str,
    root: &str,
) -> std::result::Result<(PageRecord, Vec<String>), CrawlError> {
    let html = session.fetch(url).await?;
    let record = extract_page(&html, url, framework)?;
    let links = documentation_links(&html, root)?;
    Ok((record, links))
}
