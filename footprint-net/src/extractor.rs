//! Content extractor
//!
//! Reduces a public profile page to a bounded plain-text excerpt.
//! Any failure yields an empty excerpt.

use scraper::node::Node;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, warn};

use crate::prober::with_deadline;
use crate::Fetcher;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Fetch a page and return at most `max_chars` characters of visible text
pub async fn extract<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    max_chars: usize,
    timeout: Duration,
) -> String {
    let page = match with_deadline(timeout, fetcher.fetch(url)).await {
        Ok(page) => page,
        Err(e) => {
            warn!("Failed to extract {}: {}", url, e);
            return String::new();
        }
    };

    if !(200..300).contains(&page.status) {
        warn!("Extraction of {} returned status: {}", url, page.status);
        return String::new();
    }

    let excerpt = truncate_chars(&extract_text(&page.body), max_chars);
    debug!(
        "Extracted {} chars from {} (final url {})",
        excerpt.chars().count(),
        url,
        page.final_url
    );
    excerpt
}

/// Visible text of an HTML document with whitespace collapsed
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts = Vec::new();

    for node_ref in document.root_element().descendants() {
        let Node::Text(text) = node_ref.value() else {
            continue;
        };

        let hidden = node_ref.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| HIDDEN_ELEMENTS.contains(&el.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    normalize_whitespace(&parts.join(" "))
}

/// Collapse runs of whitespace to single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the first `max_chars` characters, respecting char boundaries
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].trim_end().to_string(),
        None => text.to_string(),
    }
}
