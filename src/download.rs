//! Sample project archives
//!
//! Sample project pages link a zip of the Xcode project. The archive is
//! unpacked once into a per-project directory, which later runs reuse, and
//! every Swift source in it becomes a [`CodeSampleRecord`].

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::crawler::{CrawlError, CrawlerConfig};
use crate::extract::{SampleProject, split_source_header};
use crate::records::CodeSampleRecord;

/// Downloads and reads sample project archives
#[derive(Debug, Clone)]
pub struct SampleDownloader {
    client: Client,
    root: PathBuf,
}

impl SampleDownloader {
    /// Create a downloader that unpacks archives under `root`
    pub fn new(root: impl Into<PathBuf>, config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(config.download_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            root: root.into(),
        })
    }

    /// Directory a project's archive is unpacked into, named after its page path
    pub fn project_dir(&self, page_url: &str) -> Result<PathBuf, CrawlError> {
        let url = Url::parse(page_url)?;
        Ok(self.root.join(url.path().trim_matches('/').replace('/', "_")))
    }

    /// Swift sources of `project`, downloading its archive unless already unpacked
    ///
    /// Projects without a download link yield no records.
    #[instrument(skip(self, project), fields(url = %project.url))]
    pub async fn fetch_project(&self, project: &SampleProject) -> Result<Vec<CodeSampleRecord>, CrawlError> {
        let Some(download_url) = project.download_url.as_deref() else {
            debug!("No download link on {}", project.url);
            return Ok(Vec::new());
        };
        let dir = self.project_dir(&project.url)?;

        if is_populated(&dir) {
            info!("{} already unpacked, skipping download", dir.display());
        } else {
            self.download(download_url, &dir).await?;
        }

        let project = project.clone();
        tokio::task::spawn_blocking(move || collect_swift_sources(&dir, &project)).await?
    }

    async fn download(&self, download_url: &str, dir: &Path) -> Result<(), CrawlError> {
        info!("Downloading {}", download_url);
        let response = self.client.get(download_url).send().await?;
        if !response.status().is_success() {
            return Err(CrawlError::Download {
                url: download_url.to_string(),
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().await?;

        let target = dir.to_path_buf();
        let unpacked = tokio::task::spawn_blocking(move || unpack(&bytes, &target)).await?;
        if unpacked.is_err() && dir.exists() {
            if let Err(e) = tokio::fs::remove_dir_all(dir).await {
                warn!("Failed to clean up {}: {}", dir.display(), e);
            }
        }
        unpacked
    }
}

fn is_populated(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

fn unpack(bytes: &[u8], target: &Path) -> Result<(), CrawlError> {
    fs::create_dir_all(target)?;
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    archive.extract(target)?;
    debug!("Unpacked {} entries into {}", archive.len(), target.display());
    Ok(())
}

/// One record per `.swift` file under `dir`, in path order
///
/// A file's leading comment header is dropped; its `Abstract:` text, when
/// present, replaces the page description.
pub fn collect_swift_sources(dir: &Path, project: &SampleProject) -> Result<Vec<CodeSampleRecord>, CrawlError> {
    let mut records = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "swift") {
            continue;
        }

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                warn!("Skipping unreadable source {}: {}", path.display(), e);
                continue;
            }
        };
        let (summary, body) = split_source_header(&source);

        records.push(CodeSampleRecord {
            url: project.url.clone(),
            title: project.title.clone(),
            description: summary.unwrap_or_else(|| project.description.clone()),
            code_title: entry.file_name().to_string_lossy().into_owned(),
            code_sample: body.to_string(),
        });
        debug!("Processed file: {}", path.display());
    }

    Ok(records)
}
