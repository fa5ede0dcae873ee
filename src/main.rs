//! # devdocs CLI
//!
//! Command-line entry point for the documentation scrapers.
//!
//! ## Subcommands
//!
//! - `docs`: crawl Apple framework documentation into per-framework files
//!   and one merged export
//! - `samples`: collect WWDC session code and sample project sources
//! - `swift-book`: crawl The Swift Programming Language
//!
//! Every subcommand drives a headless Chromium through a bounded worker pool
//! and writes `txt` or `csv` output.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use devdocs::crawler::{ChromeFactory, CrawlerConfig};
use devdocs::jobs::{self, DocsOptions, JobSummary, SamplesOptions, SwiftBookOptions};
use devdocs::logging::{LogLevel, setup_logging};
use devdocs::output::{OutputConfig, OutputFormat};
use tracing::instrument;

#[derive(Parser)]
#[command(author, version, about = "Scrape Apple and Swift developer documentation into text or CSV", long_about = None)]
struct Cli {
    /// Log verbosity; RUST_LOG takes precedence when set
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warning)]
    log_level: LogLevel,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Show the browser window
    #[arg(long, global = true)]
    no_headless: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl Apple framework documentation
    Docs(DocsArgs),

    /// Collect WWDC session code and sample project sources
    Samples(SamplesArgs),

    /// Crawl The Swift Programming Language book
    SwiftBook(SwiftBookArgs),
}

#[derive(Args, Debug)]
struct DocsArgs {
    /// Maximum number of concurrent browser sessions
    #[arg(short = 'w', long, default_value = "4")]
    max_workers: usize,

    /// Seconds to wait for each page
    #[arg(short, long, default_value = "30")]
    timeout: u64,

    /// Maximum pages per framework (0 for unlimited)
    #[arg(short = 'p', long, default_value = "0")]
    max_pages: usize,

    /// Directory for the per-framework files
    #[arg(short, long, default_value = "data")]
    output_dir: PathBuf,

    /// Name of the merged export, without extension
    #[arg(short, long, default_value = "documentation")]
    merged_output: String,

    /// Output format (txt|csv)
    #[arg(short = 'f', long, default_value = "txt", value_parser = ["txt", "csv"])]
    output_format: String,

    /// Keep only the per-framework files
    #[arg(long)]
    no_merge: bool,

    /// Framework root URL to crawl instead of the built-in list (repeatable)
    #[arg(long = "framework")]
    frameworks: Vec<String>,
}

#[derive(Args, Debug)]
struct SamplesArgs {
    /// Maximum number of concurrent browser sessions
    #[arg(short = 'w', long, default_value = "4")]
    max_workers: usize,

    /// Seconds to wait for each page
    #[arg(short, long, default_value = "30")]
    timeout: u64,

    /// Seconds to wait for each sample project download
    #[arg(long, default_value = "120")]
    download_timeout: u64,

    /// Directory for the export
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Name of the export, without extension
    #[arg(short, long, default_value = "code_samples")]
    output: String,

    /// Output format (txt|csv)
    #[arg(short = 'f', long, default_value = "txt", value_parser = ["txt", "csv"])]
    output_format: String,

    /// Where downloaded sample projects are unpacked
    #[arg(long, default_value = "code_samples")]
    samples_dir: PathBuf,
}

#[derive(Args, Debug)]
struct SwiftBookArgs {
    /// Maximum number of concurrent browser sessions
    #[arg(short = 'w', long, default_value = "5")]
    max_workers: usize,

    /// Seconds to wait for each page
    #[arg(short, long, default_value = "30")]
    timeout: u64,

    /// Maximum number of pages (0 for unlimited)
    #[arg(short = 'p', long, default_value = "0")]
    max_pages: usize,

    /// Directory for the export
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Name of the export, without extension
    #[arg(short, long, default_value = "swift_documentation")]
    output: String,

    /// Output format (txt|csv)
    #[arg(short = 'f', long, alias = "output-format", default_value = "txt", value_parser = ["txt", "csv"])]
    format: String,

    /// Root of the book
    #[arg(long, default_value = jobs::swift_book::SWIFT_BOOK_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let _guard = setup_logging(cli.log_level, cli.log_file.as_deref())?;
    let headless = !cli.no_headless;

    // Execute the appropriate command
    match cli.command {
        Some(Commands::Docs(args)) => {
            docs_command(args, headless).await?;
        }
        Some(Commands::Samples(args)) => {
            samples_command(args, headless).await?;
        }
        Some(Commands::SwiftBook(args)) => {
            swift_book_command(args, headless).await?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["devdocs", "--help"]);
        }
    }

    Ok(())
}

fn report(summary: &JobSummary) {
    println!(
        "Wrote {} records ({} skipped) in {:.2?}",
        summary.records, summary.skipped, summary.elapsed
    );
    for file in &summary.files {
        println!("  {}", file.display());
    }
}

#[instrument]
async fn docs_command(args: DocsArgs, headless: bool) -> anyhow::Result<()> {
    let config = CrawlerConfig::builder()
        .headless(headless)
        .max_workers(args.max_workers)
        .timeout_secs(args.timeout)
        .max_pages(args.max_pages)
        .build();

    let frameworks = if args.frameworks.is_empty() {
        jobs::docs::FRAMEWORKS.iter().map(|s| s.to_string()).collect()
    } else {
        args.frameworks
    };
    let format: OutputFormat = args.output_format.parse()?;
    let options = DocsOptions {
        frameworks,
        output: OutputConfig::new(args.output_dir, args.merged_output, format),
        merge: !args.no_merge,
    };

    println!("Crawling {} frameworks...", options.frameworks.len());
    let summary = jobs::run_docs(ChromeFactory::new(config.clone()), &config, &options).await?;
    report(&summary);

    Ok(())
}

#[instrument]
async fn samples_command(args: SamplesArgs, headless: bool) -> anyhow::Result<()> {
    let config = CrawlerConfig::builder()
        .headless(headless)
        .max_workers(args.max_workers)
        .timeout_secs(args.timeout)
        .download_timeout_secs(args.download_timeout)
        .build();

    let format: OutputFormat = args.output_format.parse()?;
    let options = SamplesOptions {
        video_indexes: vec![jobs::samples::VIDEO_INDEX.to_string()],
        sample_indexes: jobs::samples::SAMPLE_INDEXES.iter().map(|s| s.to_string()).collect(),
        projects: jobs::samples::SAMPLE_PROJECTS.iter().map(|s| s.to_string()).collect(),
        samples_dir: args.samples_dir,
        output: OutputConfig::new(args.output_dir, args.output, format),
    };

    println!("Collecting code samples...");
    let summary = jobs::run_samples(ChromeFactory::new(config.clone()), &config, &options).await?;
    report(&summary);

    Ok(())
}

#[instrument]
async fn swift_book_command(args: SwiftBookArgs, headless: bool) -> anyhow::Result<()> {
    let config = CrawlerConfig::builder()
        .headless(headless)
        .max_workers(args.max_workers)
        .timeout_secs(args.timeout)
        .max_pages(args.max_pages)
        .build();

    let format: OutputFormat = args.format.parse()?;
    let options = SwiftBookOptions {
        base_url: args.base_url,
        output: OutputConfig::new(args.output_dir, args.output, format),
    };

    println!("Crawling {}...", options.base_url);
    let summary = jobs::run_swift_book(ChromeFactory::new(config.clone()), &config, &options).await?;
    report(&summary);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_defaults() {
        let cli = Cli::parse_from(["devdocs", "docs"]);
        assert_eq!(cli.log_level, LogLevel::Warning);
        let Some(Commands::Docs(args)) = cli.command else {
            panic!("expected docs command");
        };
        assert_eq!(args.max_workers, 4);
        assert_eq!(args.timeout, 30);
        assert_eq!(args.max_pages, 0);
        assert_eq!(args.output_dir, PathBuf::from("data"));
        assert_eq!(args.merged_output, "documentation");
        assert_eq!(args.output_format, "txt");
        assert!(!args.no_merge);
        assert!(args.frameworks.is_empty());
    }

    #[test]
    fn test_swift_book_format_alias() {
        let cli = Cli::parse_from(["devdocs", "swift-book", "--output-format", "csv", "--log-level", "DEBUG"]);
        assert_eq!(cli.log_level, LogLevel::Debug);
        let Some(Commands::SwiftBook(args)) = cli.command else {
            panic!("expected swift-book command");
        };
        assert_eq!(args.format, "csv");
        assert_eq!(args.max_workers, 5);
        assert_eq!(args.output, "swift_documentation");
    }

    #[test]
    fn test_samples_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["devdocs", "samples", "--output-format", "json"]).is_err());
    }

    #[test]
    fn test_repeated_framework_flag() {
        let cli = Cli::parse_from([
            "devdocs",
            "--no-headless",
            "docs",
            "--framework",
            "https://developer.apple.com/documentation/metal",
            "--framework",
            "https://developer.apple.com/documentation/arkit",
        ]);
        assert!(cli.no_headless);
        let Some(Commands::Docs(args)) = cli.command else {
            panic!("expected docs command");
        };
        assert_eq!(args.frameworks.len(), 2);
    }
}
