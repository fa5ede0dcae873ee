//! WWDC code samples
//!
//! Two sources feed one export. Session pages linked from the video index
//! carry the code shown in each talk. Sample projects, linked as "View code"
//! from the WWDC sample-code indexes or listed up front, carry a zip whose
//! Swift sources are unpacked and read.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, error, info, instrument};

use crate::crawler::links::{sample_code_links, session_links};
use crate::crawler::pool::progress_bar;
use crate::crawler::{CrawlError, CrawlerConfig, Session, SessionFactory, Step, WorkerPool};
use crate::download::SampleDownloader;
use crate::error::Result;
use crate::extract::{extract_sample_project, extract_session};
use crate::jobs::JobSummary;
use crate::output::{OutputConfig, write_records};
use crate::records::CodeSampleRecord;

/// Index of every WWDC session video
pub const VIDEO_INDEX: &str = "https://developer.apple.com/videos/all-videos/";

pub const SAMPLE_INDEXES: &[&str] = &[
    "https://developer.apple.com/sample-code/wwdc/2024/",
    "https://developer.apple.com/sample-code/wwdc/2023/",
];

/// Sample projects read in addition to those found on the indexes
pub const SAMPLE_PROJECTS: &[&str] = &[
    "https://developer.apple.com/documentation/visionos/world",
    "https://developer.apple.com/documentation/visionos/destination-video",
    "https://developer.apple.com/documentation/visionos/happybeam",
    "https://developer.apple.com/documentation/visionos/diorama",
    "https://developer.apple.com/documentation/visionos/swift-splash",
    "https://developer.apple.com/documentation/visionos/incorporating-real-world-surroundings-in-an-immersive-experience",
    "https://developer.apple.com/documentation/visionos/placing-content-on-detected-planes",
    "https://developer.apple.com/documentation/visionos/tracking-points-in-world-space",
    "https://developer.apple.com/documentation/avfoundation/media_reading_and_writing/converting_side-to-side_3d_video_to_multiview_hevc",
    "https://developer.apple.com/documentation/realitykit/construct-an-immersive-environment-for-visionos",
    "https://developer.apple.com/documentation/realitykit/transforming-realitykit-entities-with-gestures",
    "https://developer.apple.com/documentation/realitykit/simulating-physics-with-collisions-in-your-visionos-app",
    "https://developer.apple.com/documentation/realitykit/simulating-particles-in-your-visionos-app",
    "https://developer.apple.com/documentation/visionOS/BOT-anist",
    "https://developer.apple.com/documentation/visionos/building-an-immersive-media-viewing-experience",
    "https://developer.apple.com/documentation/visionos/enabling-video-reflections-in-an-immersive-environment",
    "https://developer.apple.com/documentation/visionos/exploring_object_tracking_with_arkit",
    "https://developer.apple.com/documentation/realitykit/composing-interactive-3d-content-with-realitykit-and-reality-composer-pro",
    "https://developer.apple.com/documentation/realitykit/presenting-an-artists-scene",
    "https://developer.apple.com/documentation/realitykit/creating-a-spatial-drawing-app-with-realitykit",
    "https://developer.apple.com/documentation/realitykit/combining-2d-and-3d-views-in-an-immersive-app",
    "https://developer.apple.com/documentation/realitykit/creating-a-spaceship-game",
    "https://developer.apple.com/documentation/realitykit/rendering-a-windowed-game-in-stereo",
    "https://developer.apple.com/documentation/arkit/arkit_in_visionos/building_local_experiences_with_room_tracking",
    "https://developer.apple.com/documentation/healthkit/visualizing_healthkit_state_of_mind_in_visionos",
];

#[derive(Debug, Clone)]
pub struct SamplesOptions {
    /// Index pages listing WWDC session videos
    pub video_indexes: Vec<String>,

    /// WWDC sample-code index pages
    pub sample_indexes: Vec<String>,

    /// Sample project pages to read regardless of the indexes
    pub projects: Vec<String>,

    /// Where sample project archives are unpacked
    pub samples_dir: PathBuf,

    pub output: OutputConfig,
}

/// A page the samples job visits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SamplePage {
    VideoIndex(String),
    SampleIndex(String),
    Session(String),
    Project(String),
}

impl fmt::Display for SamplePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplePage::VideoIndex(url) => write!(f, "video index {}", url),
            SamplePage::SampleIndex(url) => write!(f, "sample index {}", url),
            SamplePage::Session(url) => write!(f, "session {}", url),
            SamplePage::Project(url) => write!(f, "sample project {}", url),
        }
    }
}

/// Collect session and sample project code into one export
#[instrument(skip_all, fields(output = %options.output.name))]
pub async fn run_samples<F: SessionFactory>(
    factory: F,
    config: &CrawlerConfig,
    options: &SamplesOptions,
) -> Result<JobSummary> {
    let started = Instant::now();
    let downloader = SampleDownloader::new(&options.samples_dir, config)
        .inspect_err(|e| error!("Failed to prepare {}: {}", options.samples_dir.display(), e))?;

    let seeds: Vec<SamplePage> = options
        .video_indexes
        .iter()
        .cloned()
        .map(SamplePage::VideoIndex)
        .chain(options.sample_indexes.iter().cloned().map(SamplePage::SampleIndex))
        .chain(options.projects.iter().cloned().map(SamplePage::Project))
        .collect();
    info!("Collecting code samples from {} seed pages", seeds.len());

    let pool = WorkerPool::new(factory, config.workers()).progress(progress_bar(0, "pages"));
    let report = pool
        .run(seeds, move |mut session: F::Session, page: SamplePage| {
            let downloader = downloader.clone();
            async move {
                let result = visit(&mut session, &downloader, page).await;
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
        "Code sample collection finished in {:.2?}: {} samples, {} pages skipped",
        summary.elapsed, summary.records, summary.skipped
    );
    Ok(summary)
}

async fn visit<S: Session>(
    session: &mut S,
    downloader: &SampleDownloader,
    page: SamplePage,
) -> std::result::Result<Step<SamplePage, CodeSampleRecord>, CrawlError> {
    match page {
        SamplePage::VideoIndex(url) => {
            let html = session.fetch(&url).await?;
            let links = session_links(&html, &url)?;
            info!("Found {} session links on {}", links.len(), url);
            Ok(Step::new(Vec::new()).with_follow_up(links.into_iter().map(SamplePage::Session).collect()))
        }
        SamplePage::SampleIndex(url) => {
            let html = session.fetch(&url).await?;
            let links = sample_code_links(&html, &url)?;
            info!("Found {} sample projects on {}", links.len(), url);
            Ok(Step::new(Vec::new()).with_follow_up(links.into_iter().map(SamplePage::Project).collect()))
        }
        SamplePage::Session(url) => {
            let html = session.fetch(&url).await?;
            let records = extract_session(&html, &url)?;
            debug!("{} code samples on {}", records.len(), url);
            Ok(Step::new(records))
        }
        SamplePage::Project(url) => {
            let html = session.fetch(&url).await?;
            let project = extract_sample_project(&html, &url)?;
            let records = downloader.fetch_project(&project).await?;
            debug!("{} source files in {}", records.len(), project.title);
            Ok(Step::new(records))
        }
    }
}
