//! Link discovery and the crawl frontier

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::crawler::error::CrawlError;

/// Origin that relative documentation hrefs resolve against
pub const APPLE_ORIGIN: &str = "https://developer.apple.com";

/// Parse a selector known at compile time
pub(crate) fn selector(css: &str) -> Result<Selector, CrawlError> {
    Selector::parse(css).map_err(|e| CrawlError::Other(format!("Invalid selector '{}': {}", css, e)))
}

/// Resolve every anchor matched by `anchors` against `base`, keeping those
/// accepted by `keep`, deduplicated in document order
///
/// Links carrying a `#` fragment are always dropped.
pub fn collect_links<F>(html: &str, base: &Url, anchors: &str, keep: F) -> Result<Vec<String>, CrawlError>
where
    F: Fn(&ElementRef<'_>, &str, &str) -> bool,
{
    let document = Html::parse_document(html);
    let anchors = selector(anchors)?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&anchors) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.contains('#') {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        let resolved = String::from(resolved);
        if keep(&element, href, &resolved) && seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }
    Ok(links)
}

/// Documentation links inside `<main>` that stay under `framework_root`
pub fn documentation_links(html: &str, framework_root: &str) -> Result<Vec<String>, CrawlError> {
    let origin = Url::parse(APPLE_ORIGIN)?;
    collect_links(html, &origin, "main a[href]", |_, href, resolved| {
        href.starts_with("/documentation") && within(resolved, framework_root)
    })
}

/// Links anywhere on the page that resolve under `prefix`
pub fn scoped_links(html: &str, page_url: &str, prefix: &str) -> Result<Vec<String>, CrawlError> {
    let base = Url::parse(page_url)?;
    collect_links(html, &base, "a[href]", |_, _, resolved| within(resolved, prefix))
}

/// `url` is `root` itself or a path below it
fn within(url: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    url.strip_prefix(root)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
}

/// WWDC session pages linked from the video index
pub fn session_links(html: &str, page_url: &str) -> Result<Vec<String>, CrawlError> {
    let base = Url::parse(page_url)?;
    collect_links(html, &base, "a[href]", |_, href, _| href.contains("videos/play/"))
}

/// Sample project pages linked as "View code" from a WWDC sample-code index
pub fn sample_code_links(html: &str, page_url: &str) -> Result<Vec<String>, CrawlError> {
    let base = Url::parse(page_url)?;
    collect_links(
        html,
        &base,
        "a.icon.icon-after.icon-chevronright[href]",
        |element, _, _| element.text().collect::<String>().contains("View code"),
    )
}

/// Framework name from a root like `https://developer.apple.com/documentation/swiftui`
pub fn framework_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
    segments.nth(1).map(str::to_lowercase)
}

/// Lowercase, strip trailing slashes and deduplicate framework seed URLs
pub fn normalize_seeds<I, S>(seeds: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    seeds
        .into_iter()
        .map(|s| s.as_ref().trim().trim_end_matches('/').to_lowercase())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

/// FIFO crawl queue that admits each item once, up to an optional cap
#[derive(Debug)]
pub struct Frontier<T = String> {
    queue: VecDeque<T>,
    seen: HashSet<T>,
    limit: usize,
}

impl<T: Eq + Hash + Clone> Frontier<T> {
    /// `limit` of 0 means unbounded
    pub fn new(limit: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            limit,
        }
    }

    /// Queue `item` unless it was seen before or the cap is reached
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() || self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.queue.push_back(item);
        true
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        let mut admitted = 0;
        for item in items {
            if self.push(item) {
                admitted += 1;
            }
        }
        admitted
    }

    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    /// Number of items ever admitted
    pub fn admitted(&self) -> usize {
        self.seen.len()
    }

    pub fn is_full(&self) -> bool {
        self.limit > 0 && self.seen.len() >= self.limit
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
