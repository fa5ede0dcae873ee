//! Export of scraped records to flat text or CSV files

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::records::Record;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Labeled text blocks
    #[default]
    Txt,
    /// One header row plus one row per record
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(Error::Config(format!("Unknown output format: {}", other))),
        }
    }
}

/// Where a job writes its export
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Directory holding the export files
    pub dir: PathBuf,

    /// File name of the main export, without extension
    pub name: String,

    pub format: OutputFormat,
}

impl OutputConfig {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            format,
        }
    }

    /// Path of the main export file
    pub fn path(&self) -> PathBuf {
        self.file(&self.name)
    }

    /// Path of a sibling export named `stem`
    pub fn file(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", stem, self.format.extension()))
    }
}

/// Write `records` to `path`, replacing any existing file
///
/// CSV output always carries the header row, even with no records.
pub fn write_records<R: Record>(path: &Path, records: &[R], format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;

    match format {
        OutputFormat::Txt => {
            let mut writer = BufWriter::new(file);
            for record in records {
                record.write_text(&mut writer)?;
            }
            writer.flush()?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(R::COLUMNS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
    }

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Concatenate per-framework exports into one file
///
/// Text files are appended one after another, each followed by a newline.
/// CSV files contribute the first file's header once and all their rows.
/// Returns the number of files merged; with no inputs nothing is written.
pub fn merge_files(inputs: &[PathBuf], output: &Path, format: OutputFormat) -> Result<usize> {
    if inputs.is_empty() {
        warn!("No files found to merge");
        return Ok(0);
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        OutputFormat::Txt => {
            let mut writer = BufWriter::new(File::create(output)?);
            for input in inputs {
                writer.write_all(fs::read_to_string(input)?.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_path(output)?;
            let mut header_written = false;
            for input in inputs {
                let mut reader = csv::Reader::from_path(input)?;
                if !header_written {
                    writer.write_record(reader.headers()?)?;
                    header_written = true;
                }
                for row in reader.records() {
                    writer.write_record(&row?)?;
                }
            }
            writer.flush()?;
        }
    }

    info!("Merged {} files into {}", inputs.len(), output.display());
    Ok(inputs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{PageRecord, SwiftDocRecord};
    use tempfile::tempdir;

    fn record(url: &str, content: &str) -> PageRecord {
        PageRecord {
            framework: "metal".to_string(),
            url: url.to_string(),
            category: "Class".to_string(),
            title: "MTLDevice".to_string(),
            summary: "The GPU, \"quoted\".".to_string(),
            platforms: vec!["iOS 8.0+".to_string(), "macOS 10.11+".to_string()],
            code: None,
            content: content.to_string(),
        }
    }

    fn csv_urls(path: &Path) -> Vec<String> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap().get(1).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Txt);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("json".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_config_paths() {
        let config = OutputConfig::new("data", "documentation", OutputFormat::Csv);
        assert_eq!(config.path(), Path::new("data/documentation.csv"));
        assert_eq!(config.file("swiftui"), Path::new("data/swiftui.csv"));
    }

    #[test]
    fn test_csv_escapes_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metal.csv");
        let records = vec![record("https://developer.apple.com/documentation/metal/mtldevice", "Line one\nLine, two")];

        write_records(&path, &records, OutputFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().iter().collect::<Vec<_>>(), PageRecord::COLUMNS);
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[4], "The GPU, \"quoted\".");
        assert_eq!(&row[5], "iOS 8.0+, macOS 10.11+");
        assert_eq!(&row[6], "");
        assert_eq!(&row[7], "Line one\nLine, two");
    }

    #[test]
    fn test_empty_csv_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("empty.csv");

        write_records::<SwiftDocRecord>(&path, &[], OutputFormat::Csv).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "url,content\n");
    }

    #[test]
    fn test_txt_and_csv_cover_same_urls() {
        let dir = tempdir().unwrap();
        let records = vec![
            record("https://developer.apple.com/documentation/metal", "Root"),
            record("https://developer.apple.com/documentation/metal/mtlbuffer", "Buffer"),
        ];
        let txt = dir.path().join("metal.txt");
        let csv_path = dir.path().join("metal.csv");

        write_records(&txt, &records, OutputFormat::Txt).unwrap();
        write_records(&csv_path, &records, OutputFormat::Csv).unwrap();

        let text = fs::read_to_string(&txt).unwrap();
        let txt_urls: Vec<_> = text
            .lines()
            .filter_map(|l| l.strip_prefix("url: "))
            .map(str::to_string)
            .collect();
        assert_eq!(txt_urls, csv_urls(&csv_path));
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metal.txt");
        fs::write(&path, "stale contents that are much longer than the new export").unwrap();

        write_records::<PageRecord>(&path, &[], OutputFormat::Txt).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_merge_csv_single_header() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        write_records(&a, &[record("https://x.test/a", "A")], OutputFormat::Csv).unwrap();
        write_records(&b, &[record("https://x.test/b", "B"), record("https://x.test/c", "C")], OutputFormat::Csv)
            .unwrap();
        let merged = dir.path().join("documentation.csv");

        let count = merge_files(&[a, b], &merged, OutputFormat::Csv).unwrap();

        assert_eq!(count, 2);
        assert_eq!(csv_urls(&merged), vec!["https://x.test/a", "https://x.test/b", "https://x.test/c"]);
        let text = fs::read_to_string(&merged).unwrap();
        assert_eq!(text.matches("framework,url").count(), 1);
    }

    #[test]
    fn test_merge_txt_concatenates() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "first").unwrap();
        fs::write(&b, "second").unwrap();
        let merged = dir.path().join("all.txt");

        merge_files(&[a, b], &merged, OutputFormat::Txt).unwrap();

        assert_eq!(fs::read_to_string(&merged).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_merge_nothing() {
        let dir = tempdir().unwrap();
        let merged = dir.path().join("all.txt");
        assert_eq!(merge_files(&[], &merged, OutputFormat::Txt).unwrap(), 0);
        assert!(!merged.exists());
    }
}
