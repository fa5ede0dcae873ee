//! Site-specific field extraction from rendered pages
//!
//! Extractors never fail because a field is missing: the field is left empty.
//! The only per-page failure is a page without a `<main>` element.

pub mod apple;
pub mod samples;
pub mod swift;

use html2md::parse_html;
use scraper::{ElementRef, Html, Selector};

use crate::crawler::CrawlError;
use crate::crawler::browser::MAIN_SELECTOR;
use crate::crawler::links::selector;

pub use apple::extract_page;
pub use samples::{SampleProject, extract_sample_project, extract_session, split_source_header};
pub use swift::extract_swift_page;

/// The page's `<main>` element, or a missing element error
pub(crate) fn main_element<'a>(document: &'a Html, url: &str) -> Result<ElementRef<'a>, CrawlError> {
    let main = selector(MAIN_SELECTOR)?;
    document
        .select(&main)
        .next()
        .ok_or_else(|| CrawlError::MissingElement {
            url: url.to_string(),
            selector: MAIN_SELECTOR.to_string(),
        })
}

/// First match of `css` under `scope`
pub(crate) fn first<'a>(scope: ElementRef<'a>, css: &Selector) -> Option<ElementRef<'a>> {
    scope.select(css).next()
}

/// Text content with whitespace runs collapsed to single spaces
pub fn inline_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text content with line structure kept, trimmed at both ends
pub fn code_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Markdown rendering of an element and everything under it, trimmed
///
/// Keeps the structure a reader needs: headings, lists, code blocks and table
/// cells stay separated.
pub fn markdown_text(element: ElementRef<'_>) -> String {
    parse_html(&element.html()).trim().to_string()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(html: &str) -> Html {
        Html::parse_fragment(html)
    }

    #[test]
    fn test_inline_text_collapses_whitespace() {
        let doc = root("<p>  A   type\n that <code>represents</code>  a view. </p>");
        let p = doc.select(&selector("p").unwrap()).next().unwrap();
        assert_eq!(inline_text(p), "A type that represents a view.");
    }

    #[test]
    fn test_markdown_text_blocks_on_separate_lines() {
        let doc = root("<div><h2>Overview</h2><p>First <em>para</em>graph.</p><ul><li>One</li><li>Two</li></ul></div>");
        let div = doc.select(&selector("div").unwrap()).next().unwrap();
        let text = markdown_text(div);

        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert!(lines[0].contains("Overview"));
        assert!(lines.iter().any(|l| l.contains("graph.") && l.contains("First")));
        assert!(lines.iter().any(|l| l.ends_with("One")));
        assert!(lines.iter().any(|l| l.ends_with("Two")));
    }

    #[test]
    fn test_markdown_text_keeps_code_lines() {
        let doc = root("<div><p>Example</p><pre><code>let x = 1\nprint(x)</code></pre></div>");
        let div = doc.select(&selector("div").unwrap()).next().unwrap();
        let text = markdown_text(div);

        assert!(text.starts_with("Example"));
        assert!(text.contains("let x = 1\nprint(x)"));
    }

    #[test]
    fn test_markdown_text_separates_table_cells() {
        let doc = root(
            "<div><table><tr><th>Operator</th><th>Description</th></tr>\
             <tr><td>a..&lt;b</td><td>Half-open range</td></tr></table></div>",
        );
        let div = doc.select(&selector("div").unwrap()).next().unwrap();
        let text = markdown_text(div);

        assert!(!text.contains("OperatorDescription"));
        assert!(!text.contains("bHalf-open"));
        let header = text.lines().find(|l| l.contains("Operator")).unwrap();
        assert!(header.contains("Description"));
        let row = text.lines().find(|l| l.contains("Half-open range")).unwrap();
        assert!(row.contains("a.."));
        assert_ne!(header, row);
    }

    #[test]
    fn test_main_element_missing() {
        let doc = Html::parse_document("<html><body><div>No main</div></body></html>");
        let err = main_element(&doc, "https://example.com").unwrap_err();
        assert!(matches!(err, CrawlError::MissingElement { .. }));
    }
}
