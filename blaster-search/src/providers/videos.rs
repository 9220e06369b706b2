//! Video search — scrapes the YouTube results page.
//!
//! YouTube renders results from a `ytInitialData` JSON blob embedded in an
//! inline script. Rather than deserialising the whole (enormous, unstable)
//! structure, each `videoRenderer` block is located by regex and the id,
//! title and channel are lifted out of its slice.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::Provider;
use crate::types::{SearchCategory, VideoResult};
use regex::Regex;
use std::sync::OnceLock;

/// YouTube results-page scraper.
pub struct VideosProvider {
    base_url: String,
}

impl Default for VideosProvider {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".into(),
        }
    }
}

impl VideosProvider {
    /// Create a provider pointed at youtube.com.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Provider for VideosProvider {
    type Item = VideoResult;

    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<VideoResult>, SearchError> {
        tracing::trace!(query, "YouTube search");

        let client = http::build_client(config)?;
        let response = client
            .get(format!("{}/results", self.base_url))
            .query(&[("search_query", query)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("YouTube request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("YouTube HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("YouTube response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "YouTube response received");

        Ok(parse_youtube_html(&html, config.max_results))
    }

    fn category(&self) -> SearchCategory {
        SearchCategory::Videos
    }
}

/// Start of a `videoRenderer` block, capturing the 11-character video id.
fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""videoRenderer":\{"videoId":"([A-Za-z0-9_-]{11})""#)
            .expect("video id regex is valid")
    })
}

/// Title runs inside a renderer block.
fn title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""title":\{"runs":\[\{"text":"((?:[^"\\]|\\.)*)""#)
            .expect("title regex is valid")
    })
}

/// Channel name (`ownerText`) inside a renderer block.
fn channel_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""ownerText":\{"runs":\[\{"text":"((?:[^"\\]|\\.)*)""#)
            .expect("channel regex is valid")
    })
}

/// Decode a JSON string literal body (`&`, `\"` and friends).
fn decode_json_string(escaped: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{escaped}\"")).unwrap_or_else(|_| escaped.to_owned())
}

/// Parse the YouTube results page into video results.
///
/// Renderer blocks are sliced between consecutive `videoRenderer` matches
/// so the title/channel regexes only see their own block. Duplicate ids
/// (YouTube repeats the data blob) are dropped.
pub(crate) fn parse_youtube_html(html: &str, max_results: usize) -> Vec<VideoResult> {
    let matches: Vec<_> = video_id_regex().captures_iter(html).collect();

    let mut seen = std::collections::HashSet::new();
    let mut results = Vec::new();

    for (i, caps) in matches.iter().enumerate() {
        let video_id = caps[1].to_owned();
        if !seen.insert(video_id.clone()) {
            continue;
        }

        let block_start = caps.get(0).map(|m| m.end()).unwrap_or(0);
        let block_end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(html.len());
        let block = &html[block_start..block_end];

        let title = title_regex()
            .captures(block)
            .map(|c| decode_json_string(&c[1]))
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let channel = channel_regex()
            .captures(block)
            .map(|c| decode_json_string(&c[1]))
            .unwrap_or_default();

        results.push(VideoResult {
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            thumbnail: format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"),
            video_id,
            title,
            channel,
        });

        if results.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = results.len(), "YouTube results parsed");
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_YT_HTML: &str = r#"<html><body><script>
    var ytInitialData = {"contents":[
        {"videoRenderer":{"videoId":"dQw4w9WgXcQ","thumbnail":{},
         "title":{"runs":[{"text":"First Video & More"}]},
         "ownerText":{"runs":[{"text":"Channel One"}]}}},
        {"videoRenderer":{"videoId":"abc123def45","thumbnail":{},
         "title":{"runs":[{"text":"Second \"Quoted\" Video"}]},
         "ownerText":{"runs":[{"text":"Channel Two"}]}}},
        {"videoRenderer":{"videoId":"dQw4w9WgXcQ","thumbnail":{},
         "title":{"runs":[{"text":"Duplicate Entry"}]},
         "ownerText":{"runs":[{"text":"Channel One"}]}}}
    ]};
    </script></body></html>"#;

    #[test]
    fn parses_video_ids_and_titles() {
        let results = parse_youtube_html(MOCK_YT_HTML, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].video_id, "dQw4w9WgXcQ");
        assert_eq!(results[0].title, "First Video & More");
        assert_eq!(results[0].channel, "Channel One");
    }

    #[test]
    fn decodes_escaped_quotes_in_titles() {
        let results = parse_youtube_html(MOCK_YT_HTML, 10);
        assert_eq!(results[1].title, "Second \"Quoted\" Video");
    }

    #[test]
    fn duplicate_video_ids_dropped() {
        let results = parse_youtube_html(MOCK_YT_HTML, 10);
        let ids: Vec<_> = results.iter().map(|r| r.video_id.as_str()).collect();
        assert_eq!(ids, vec!["dQw4w9WgXcQ", "abc123def45"]);
    }

    #[test]
    fn watch_url_and_thumbnail_derived_from_id() {
        let results = parse_youtube_html(MOCK_YT_HTML, 10);
        assert_eq!(results[0].url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(
            results[0].thumbnail,
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }

    #[test]
    fn respects_max_results() {
        let results = parse_youtube_html(MOCK_YT_HTML, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn empty_page_returns_empty() {
        assert!(parse_youtube_html("<html><body></body></html>", 10).is_empty());
    }

    #[test]
    fn renderer_without_title_skipped() {
        let html = r#"{"videoRenderer":{"videoId":"noTitleVid1","thumbnail":{}}}"#;
        assert!(parse_youtube_html(html, 10).is_empty());
    }

    #[test]
    fn provider_category_is_videos() {
        assert_eq!(VideosProvider::new().category(), SearchCategory::Videos);
    }
}
