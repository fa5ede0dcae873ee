//! The Swift Programming Language book

use scraper::Html;

use super::{main_element, markdown_text};
use crate::crawler::CrawlError;
use crate::records::SwiftDocRecord;

/// Readable text of a book page's `<main>` element
pub fn extract_swift_page(html: &str, url: &str) -> Result<SwiftDocRecord, CrawlError> {
    let document = Html::parse_document(html);
    let main = main_element(&document, url)?;

    Ok(SwiftDocRecord {
        url: url.to_string(),
        content: markdown_text(main),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_swift_page() {
        let html = r#"<html><body>
            <nav><a href="x">Sidebar</a></nav>
            <main>
              <h1>The Basics</h1>
              <p>Work with common kinds of data and write basic syntax.</p>
              <pre><code>let maximumNumberOfLoginAttempts = 10
var currentLoginAttempt = 0</code></pre>
            </main>
        </body></html>"#;
        let url = "https://docs.swift.org/swift-book/documentation/the-swift-programming-language/thebasics";

        let record = extract_swift_page(html, url).unwrap();

        assert_eq!(record.url, url);
        assert!(record.content.starts_with("# The Basics") || record.content.starts_with("The Basics"));
        assert!(record.content.contains("Work with common kinds of data and write basic syntax."));
        assert!(record.content.contains("let maximumNumberOfLoginAttempts = 10\nvar currentLoginAttempt = 0"));
        assert!(!record.content.contains("Sidebar"));
    }

    #[test]
    fn test_page_without_main() {
        let result = extract_swift_page("<html><body><p>loading</p></body></html>", "https://docs.swift.org");
        assert!(result.is_err());
    }
}
