//! WWDC session pages and sample project pages

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use tracing::debug;
use url::Url;

use super::{collapse_whitespace, first, inline_text, main_element};
use crate::crawler::CrawlError;
use crate::crawler::links::selector;
use crate::records::CodeSampleRecord;

/// Code listings shown under a WWDC session video
///
/// A session without listings still yields one record with empty code fields,
/// so every visited session shows up in the export.
pub fn extract_session(html: &str, url: &str) -> Result<Vec<CodeSampleRecord>, CrawlError> {
    let document = Html::parse_document(html);
    let main = main_element(&document, url)?;

    let details = first(main, &selector(".supplement.details.active")?);
    let title = details
        .and_then(|d| first(d, &selector("h1").ok()?))
        .map(inline_text)
        .unwrap_or_default();
    let description = details
        .and_then(|d| first(d, &selector("p").ok()?))
        .map(inline_text)
        .unwrap_or_default();
    debug!("Session '{}' at {}", title, url);

    let jump = selector(".jump-to-time-sample")?;
    let source = selector(".code-source")?;
    let mut records = Vec::new();
    for container in main.select(&selector(".sample-code-main-container")?) {
        let code_sample = container
            .select(&source)
            .map(|code| code.text().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        if code_sample.trim().is_empty() {
            continue;
        }
        let code_title = first(container, &jump).map(inline_text).unwrap_or_default();
        debug!("Code sample '{}' on {}", code_title, url);

        records.push(CodeSampleRecord {
            url: url.to_string(),
            title: title.clone(),
            description: description.clone(),
            code_title,
            code_sample,
        });
    }

    if records.is_empty() {
        records.push(CodeSampleRecord {
            url: url.to_string(),
            title,
            description,
            code_title: String::new(),
            code_sample: String::new(),
        });
    }
    Ok(records)
}

/// A sample project page and its downloadable archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleProject {
    pub url: String,
    pub title: String,
    pub description: String,
    pub download_url: Option<String>,
}

/// Title, abstract and download link of a sample project page
pub fn extract_sample_project(html: &str, url: &str) -> Result<SampleProject, CrawlError> {
    let document = Html::parse_document(html);
    let main = main_element(&document, url)?;

    let title = first(main, &selector(".title")?)
        .map(inline_text)
        .unwrap_or_default();
    let description = first(main, &selector(".abstract.content")?)
        .map(inline_text)
        .unwrap_or_default();

    let base = Url::parse(url)?;
    let download_url = first(main, &selector("a.sample-download[href]")?)
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| base.join(href).ok())
        .map(String::from);

    Ok(SampleProject {
        url: url.to_string(),
        title,
        description,
        download_url,
    })
}

static ABSTRACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Abstract:").expect("abstract pattern is valid"));

/// Strip a leading `/* ... */` file header, returning its `Abstract:` text
///
/// Sources without a closed leading block comment are returned unchanged.
pub fn split_source_header(source: &str) -> (Option<String>, &str) {
    let Some(rest) = source.strip_prefix("/*") else {
        return (None, source);
    };
    let Some(end) = rest.find("*/") else {
        return (None, source);
    };

    let header = &rest[..end];
    let body = rest[end + 2..].trim();

    let summary = ABSTRACT
        .find(header)
        .map(|m| {
            let paragraph = header[m.end()..].trim_start().split("\n\n").next().unwrap_or_default();
            collapse_whitespace(paragraph)
        })
        .filter(|s| !s.is_empty());

    (summary, body)
}
