//! Flat record types produced by the scrapers
//!
//! Every record is created once per fetched page (or per code sample), never
//! mutated, and handed to the [`output`](crate::output) writers.

use serde::{Serialize, Serializer};
use std::io::{self, Write};

/// A record that can be exported as a labeled text block or a tabular row
pub trait Record: Serialize {
    /// Tabular header, in field order
    const COLUMNS: &'static [&'static str];

    /// Write the record as a labeled text block, including its trailing delimiter
    fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()>;
}

/// One page of Apple framework documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// Framework the page belongs to, e.g. `swiftui`
    pub framework: String,

    /// URL of the page
    pub url: String,

    /// Eyebrow text above the title, e.g. `Structure`
    pub category: String,

    /// Page title
    pub title: String,

    /// One-paragraph summary under the title
    #[serde(rename = "abstract")]
    pub summary: String,

    /// Platform availability badges, in page order
    #[serde(serialize_with = "join_platforms")]
    pub platforms: Vec<String>,

    /// Declaration source, when the page documents a symbol
    pub code: Option<String>,

    /// Body text of the page
    pub content: String,
}

fn join_platforms<S: Serializer>(platforms: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&platforms.join(", "))
}

impl Record for PageRecord {
    const COLUMNS: &'static [&'static str] = &[
        "framework",
        "url",
        "category",
        "title",
        "abstract",
        "platforms",
        "code",
        "content",
    ];

    fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "framework: {}", self.framework)?;
        writeln!(writer, "url: {}", self.url)?;
        writeln!(writer, "category: {}", self.category)?;
        writeln!(writer, "title: {}", self.title)?;
        writeln!(writer, "abstract: {}", self.summary)?;
        writeln!(writer, "platforms: {}", self.platforms.join(", "))?;
        writeln!(writer, "code: {}", self.code.as_deref().unwrap_or_default())?;
        writeln!(writer, "content:")?;
        for line in self.content.split('\n') {
            writeln!(writer, "  {}", line)?;
        }
        writeln!(writer)
    }
}

/// A code listing from a WWDC session page or a downloaded sample project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSampleRecord {
    /// Page the sample was found on
    pub url: String,

    /// Session or sample project title
    pub title: String,

    /// Session description, or the `Abstract:` line of a source file header
    pub description: String,

    /// Timestamp label of a session snippet, or the source file name
    pub code_title: String,

    /// The code itself, verbatim
    pub code_sample: String,
}

impl Record for CodeSampleRecord {
    const COLUMNS: &'static [&'static str] =
        &["url", "title", "description", "code_title", "code_sample"];

    fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "url: {}", self.url)?;
        writeln!(writer, "title: {}", self.title)?;
        writeln!(writer, "description: {}", self.description)?;
        writeln!(writer, "code_title: {}", self.code_title)?;
        writeln!(writer, "code_sample:\n{}\n", self.code_sample)
    }
}

/// One page of The Swift Programming Language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwiftDocRecord {
    pub url: String,
    pub content: String,
}

impl Record for SwiftDocRecord {
    const COLUMNS: &'static [&'static str] = &["url", "content"];

    fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "URL: {}\n\n{}\n\n{}\n\n", self.url, self.content, "=".repeat(80))
    }
}
