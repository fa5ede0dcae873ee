//! Apple framework documentation pages

use scraper::Html;
use tracing::debug;

use super::{code_text, first, inline_text, main_element, markdown_text};
use crate::crawler::CrawlError;
use crate::crawler::links::selector;
use crate::records::PageRecord;

/// Extract a [`PageRecord`] from a rendered documentation page
///
/// # Arguments
///
/// * `html` - Rendered markup of the page
/// * `url` - URL the page was fetched from
/// * `framework` - Framework the crawl started from
///
/// # Returns
///
/// The record, or `MissingElement` if the page has no `<main>`
pub fn extract_page(html: &str, url: &str, framework: &str) -> Result<PageRecord, CrawlError> {
    let document = Html::parse_document(html);
    let main = main_element(&document, url)?;

    let title_heading = selector("h1.title")?;
    let title_span = selector("span")?;
    let title = first(main, &title_heading)
        .map(|h1| first(h1, &title_span).map(inline_text).unwrap_or_else(|| inline_text(h1)))
        .unwrap_or_default();

    let category = first(main, &selector(".eyebrow")?)
        .map(inline_text)
        .unwrap_or_default();

    let summary = first(main, &selector(".abstract.content")?)
        .map(inline_text)
        .unwrap_or_default();

    let platforms = main
        .select(&selector("span.platform")?)
        .map(inline_text)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>();

    let code = first(main, &selector("section.declaration .declaration-source-wrapper")?)
        .map(code_text)
        .filter(|c| !c.is_empty());

    let content = first(main, &selector("div.container")?)
        .map(markdown_text)
        .unwrap_or_default();

    debug!(
        "Extracted '{}' from {} ({} platforms, code: {})",
        title,
        url,
        platforms.len(),
        code.is_some()
    );

    Ok(PageRecord {
        framework: framework.to_string(),
        url: url.to_string(),
        category,
        title,
        summary,
        platforms,
        code,
        content,
    })
}
