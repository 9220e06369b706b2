//! # blaster-search
//!
//! Search-provider adapters and page crawling for Blaster.
//!
//! This crate fetches results from third-party or scraped search backends
//! and aggregates them per category — no persistence, no caching, no
//! retries. Everything is bounded by small constants: at most
//! [`config::MAX_RESULTS`] results per category, [`config::MAX_QUERIES`]
//! queries per request and [`config::MAX_CRAWL_PAGES`] pages crawled per
//! answer.
//!
//! ## Design
//!
//! - One [`providers`] module per category: DuckDuckGo (JSON with an HTML
//!   fallback), the Unsplash → Pexels → Google Images chain, YouTube,
//!   Google News RSS, and Twitter API v2 with generated data as a stand-in
//! - Concurrent fan-out over queries × categories with `join_all`
//! - Deduplication by normalised URL or id, first occurrence wins
//! - Graceful degradation: a failed category is an empty category
//!
//! ## Security
//!
//! - Credentials never appear in errors or logs
//! - Search queries are logged only at trace level

pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use orchestrator::{search_one, search_queries, QueryResults, SearchProviders};
pub use provider::Provider;
pub use types::{
    ImageResult, NewsResult, PageContent, SearchCategory, Tweet, VideoResult, WebResult,
};

/// Fetch a page and extract its readable text.
///
/// Downloads `url`, strips boilerplate and returns the main content as
/// clean text, truncated to `max_chars`.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the page cannot be fetched, or
/// [`SearchError::Parse`] if nothing extractable remains.
pub async fn crawl_page(
    url: &str,
    config: &SearchConfig,
    max_chars: usize,
) -> Result<PageContent> {
    let client = http::build_client(config)?;
    let response = client
        .get(url)
        .header("Accept", "text/html,application/xhtml+xml")
        .send()
        .await
        .map_err(|e| SearchError::Http(format!("page fetch failed: {e}")))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("page HTTP error: {e}")))?;

    let html = response
        .text()
        .await
        .map_err(|e| SearchError::Http(format!("page read failed: {e}")))?;

    tracing::trace!(url, bytes = html.len(), "page fetched");

    content::extract_page_with_limit(&html, url, max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn crawl_page_surfaces_http_errors() {
        let config = SearchConfig {
            timeout_seconds: 1,
            ..Default::default()
        };
        let result = crawl_page("http://127.0.0.1:1/page", &config, 1000).await;
        assert!(matches!(result, Err(SearchError::Http(_))));
    }

    #[tokio::test]
    async fn search_queries_validates_before_any_network_io() {
        let providers = SearchProviders::new(None, None, None);
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let result =
            search_queries(&providers, &["q".into()], SearchCategory::all(), &config).await;
        assert!(result.unwrap_err().to_string().contains("max_results"));
    }
}
