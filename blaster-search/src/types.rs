//! Core result shapes for each search category.
//!
//! Every type here mirrors an externally-defined JSON/HTML shape. There is
//! no lifecycle beyond one request/response cycle and no invariant beyond
//! "unique by URL/id within one response" and "bounded list length".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Search categories Blaster can aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    /// Web links — DuckDuckGo JSON with an HTML-scrape fallback.
    Web,
    /// Images — Unsplash, then Pexels, then a Google Images scrape.
    Images,
    /// Videos — YouTube results page.
    Videos,
    /// News — Google News RSS.
    News,
    /// Tweets — Twitter API v2, or generated data without credentials.
    Twitter,
}

impl SearchCategory {
    /// Returns the lowercase name used in API payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Images => "images",
            Self::Videos => "videos",
            Self::News => "news",
            Self::Twitter => "twitter",
        }
    }

    /// All categories, in the order they appear in responses.
    pub fn all() -> &'static [SearchCategory] {
        &[
            Self::Web,
            Self::Images,
            Self::Videos,
            Self::News,
            Self::Twitter,
        ]
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single web search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebResult {
    /// Title of the result page.
    pub title: String,
    /// URL of the result page.
    pub url: String,
    /// Text snippet summarising the page.
    pub snippet: String,
    /// Which backend produced this result ("duckduckgo-api", "duckduckgo-html").
    pub source: String,
}

/// A single image search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResult {
    /// Full-size image URL.
    pub url: String,
    /// Smaller preview URL (may equal `url` for scraped results).
    pub thumbnail: String,
    /// Alt text or caption, empty when the provider has none.
    pub alt: String,
    /// Page the image links back to (photographer page, search page).
    pub link: String,
    /// Photographer or uploader credit, empty when unknown.
    pub photographer: String,
    /// Which backend produced this result ("unsplash", "pexels", "google").
    pub source: String,
}

/// A single video search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResult {
    /// YouTube video id (11 characters).
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Watch URL.
    pub url: String,
    /// Thumbnail URL.
    pub thumbnail: String,
    /// Channel name, empty when not present in the page data.
    pub channel: String,
}

/// A single news search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResult {
    /// Headline.
    pub title: String,
    /// Article URL (Google News redirect link).
    pub url: String,
    /// Publishing outlet, empty when the feed omits it.
    pub source: String,
    /// RFC 2822 publication date string as given by the feed.
    pub published: String,
    /// Description with markup stripped.
    pub snippet: String,
}

/// A single tweet, real or generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    /// Tweet id.
    pub id: String,
    /// Tweet text.
    pub text: String,
    /// Author handle without the leading `@`.
    pub author_username: String,
    /// Author display name.
    pub author_name: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// Like count.
    pub like_count: u64,
    /// Retweet count.
    pub retweet_count: u64,
    /// Reply count.
    pub reply_count: u64,
    /// Canonical tweet URL.
    pub url: String,
}

/// Extracted readable content from a crawled web page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// The URL that was fetched.
    pub url: String,
    /// The page title extracted from HTML.
    pub title: String,
    /// Cleaned, readable text with HTML boilerplate stripped.
    pub text: String,
    /// Number of words in the extracted text.
    pub word_count: usize,
}
