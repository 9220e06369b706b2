//! Readable-text extraction for crawled result pages.
//!
//! Strips non-content elements, prefers the semantic content root
//! (`article`, `main`) over `body`, collapses whitespace and truncates to
//! a character budget so a handful of pages fit in one LLM prompt.

use crate::error::{Result, SearchError};
use crate::types::PageContent;
use scraper::{Html, Selector};

/// Default maximum characters kept from one page.
pub const DEFAULT_MAX_CHARS: usize = 12_000;

/// Elements removed (with their content) before text extraction.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe", "form",
];

/// Content roots tried in priority order.
const CONTENT_SELECTORS: &[&str] = &["article", "main", "[role=\"main\"]", "#content", "body"];

/// Extract readable text from raw HTML with the default character budget.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if no extractable content remains.
pub fn extract_page(html: &str, url: &str) -> Result<PageContent> {
    extract_page_with_limit(html, url, DEFAULT_MAX_CHARS)
}

/// Extract readable text from raw HTML, keeping at most `max_chars`.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if no extractable content remains.
pub fn extract_page_with_limit(html: &str, url: &str, max_chars: usize) -> Result<PageContent> {
    let mut stripped = html.to_owned();
    for tag in BOILERPLATE_TAGS {
        stripped = remove_element(&stripped, tag);
    }

    let document = Html::parse_document(&stripped);

    let title = page_title(&document);
    let text = collapse_whitespace(&content_text(&document));
    if text.is_empty() {
        return Err(SearchError::Parse("no extractable content found".into()));
    }

    let text = clip(&text, max_chars);
    let word_count = text.split_whitespace().count();

    Ok(PageContent {
        url: url.to_owned(),
        title,
        text,
        word_count,
    })
}

/// Text of the `<title>` element, or empty.
fn page_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
        .trim()
        .to_owned()
}

/// Text of the first non-empty content root.
fn content_text(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text: String = element.text().collect::<Vec<_>>().join(" ");
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return trimmed.to_owned();
            }
        }
    }
    String::new()
}

/// Remove every `<tag>…</tag>` block, case-insensitively.
///
/// An unclosed opening tag is removed up to its own `>` so the rest of
/// the document survives.
fn remove_element(html: &str, tag: &str) -> String {
    let lower = html.to_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(offset) = lower[pos..].find(&open) {
        let start = pos + offset;
        let after = start + open.len();

        // `<nav` must not swallow `<navigate…>`.
        let is_tag_boundary = lower[after..]
            .bytes()
            .next()
            .is_none_or(|b| matches!(b, b' ' | b'>' | b'/' | b'\n' | b'\r' | b'\t'));
        if !is_tag_boundary {
            out.push_str(&html[pos..after]);
            pos = after;
            continue;
        }

        out.push_str(&html[pos..start]);

        pos = match lower[start..].find(&close) {
            Some(close_offset) => start + close_offset + close.len(),
            None => match lower[start..].find('>') {
                Some(gt) => start + gt + 1,
                None => html.len(),
            },
        };
    }

    out.push_str(&html[pos..]);
    out
}

/// Collapse runs of spaces to one and runs of blank lines to one.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0u32;

    for line in text.lines() {
        let line = line.trim().split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            blank_run += 1;
            if blank_run == 1 && !out.is_empty() {
                out.push('\n');
            }
        } else {
            blank_run = 0;
            if !out.is_empty() && !out.ends_with('\n') {
                out.push(' ');
            }
            out.push_str(&line);
        }
    }

    out.trim().to_owned()
}

/// Truncate at a char boundary, marking the cut.
fn clip(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_owned();
    }
    let mut end = max_chars;
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    let mut clipped = text[..end].to_owned();
    clipped.push_str(" […]");
    clipped
}
