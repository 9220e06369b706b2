//! News search — Google News RSS.
//!
//! Fetches `https://news.google.com/rss/search?q=…` and parses the `<item>`
//! blocks with regex. The feed is flat, stable XML; a full XML parser buys
//! nothing here over the same regex treatment other feed-shaped endpoints
//! get in this crate.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::Provider;
use crate::types::{NewsResult, SearchCategory};
use regex::Regex;
use std::sync::OnceLock;

/// Google News RSS provider.
pub struct NewsProvider {
    base_url: String,
}

impl Default for NewsProvider {
    fn default() -> Self {
        Self {
            base_url: "https://news.google.com".into(),
        }
    }
}

impl NewsProvider {
    /// Create a provider pointed at news.google.com.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Provider for NewsProvider {
    type Item = NewsResult;

    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<NewsResult>, SearchError> {
        tracing::trace!(query, "Google News RSS request");

        let client = http::build_client(config)?;
        let response = client
            .get(format!("{}/rss/search", self.base_url))
            .query(&[("q", query), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")])
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Google News request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Google News HTTP error: {e}")))?;

        let xml = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("Google News response read failed: {e}")))?;

        tracing::trace!(bytes = xml.len(), "Google News feed received");

        parse_news_rss(&xml, config.max_results)
    }

    fn category(&self) -> SearchCategory {
        SearchCategory::News
    }
}

fn item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<item>(.*?)</item>").expect("item regex is valid"))
}

fn field_regex(tag: &str) -> Regex {
    // CDATA wrappers are optional in the feed.
    Regex::new(&format!(
        r"(?s)<{tag}[^>]*>\s*(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?\s*</{tag}>"
    ))
    .expect("field regex is valid")
}

/// Parse a Google News RSS feed into news results.
///
/// Extracted as a separate function for testability with fixture XML.
pub(crate) fn parse_news_rss(xml: &str, max_results: usize) -> Result<Vec<NewsResult>, SearchError> {
    let title_re = field_regex("title");
    let link_re = field_regex("link");
    let pub_date_re = field_regex("pubDate");
    let source_re = field_regex("source");
    let description_re = field_regex("description");

    let mut results = Vec::new();

    for item in item_regex().captures_iter(xml) {
        let block = &item[1];

        let field = |re: &Regex| {
            re.captures(block)
                .map(|c| decode_entities(c[1].trim()))
                .unwrap_or_default()
        };

        let title = field(&title_re);
        let url = field(&link_re);
        if title.is_empty() || url.is_empty() {
            continue;
        }

        results.push(NewsResult {
            title,
            url,
            source: field(&source_re),
            published: field(&pub_date_re),
            snippet: strip_markup(&field(&description_re)),
        });

        if results.len() >= max_results {
            break;
        }
    }

    if results.is_empty() && !xml.contains("<rss") {
        return Err(SearchError::Parse("response is not an RSS feed".into()));
    }

    tracing::debug!(count = results.len(), "Google News results parsed");
    Ok(results)
}

/// Remove tags from a description blob, leaving its text.
fn strip_markup(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let tag_re = RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag regex is valid"));
    decode_entities(tag_re.replace_all(text, " ").trim())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode the handful of entities the feed actually emits.
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}
