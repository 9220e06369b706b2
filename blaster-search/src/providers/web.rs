//! Web search — DuckDuckGo Instant Answer JSON with an HTML-scrape fallback.
//!
//! The JSON endpoint at `https://api.duckduckgo.com/` is cheap and
//! structured but frequently returns nothing for navigational queries, so
//! an empty answer falls through to the HTML-only results page at
//! `https://html.duckduckgo.com/html/`, which requires no JavaScript and is
//! tolerant of automated requests.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::Provider;
use crate::types::{SearchCategory, WebResult};
use scraper::{Html, Selector};
use serde::Deserialize;
use url::Url;

const SOURCE_API: &str = "duckduckgo-api";
const SOURCE_HTML: &str = "duckduckgo-html";

/// DuckDuckGo web search provider.
///
/// Tries the Instant Answer JSON API first, then scrapes the HTML-only
/// results page. Both base URLs are overridable for tests.
pub struct WebProvider {
    api_url: String,
    html_url: String,
}

impl Default for WebProvider {
    fn default() -> Self {
        Self {
            api_url: "https://api.duckduckgo.com".into(),
            html_url: "https://html.duckduckgo.com/html/".into(),
        }
    }
}

impl WebProvider {
    /// Create a provider with the production DuckDuckGo endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the Instant Answer API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the HTML results page URL.
    pub fn with_html_url(mut self, url: impl Into<String>) -> Self {
        self.html_url = url.into();
        self
    }

    /// Query the Instant Answer JSON endpoint.
    async fn instant_answer(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<WebResult>, SearchError> {
        tracing::trace!(query, "DuckDuckGo instant answer request");

        let client = http::build_client(config)?;
        let response = client
            .get(&self.api_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("no_redirect", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("instant answer request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("instant answer HTTP error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("instant answer read failed: {e}")))?;

        parse_instant_answer(&body, config.max_results)
    }

    /// Scrape the HTML-only results page.
    async fn scrape_html(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<WebResult>, SearchError> {
        tracing::trace!(query, "DuckDuckGo HTML request");

        let client = http::build_client(config)?;

        let mut params = vec![("q", query)];
        if config.safe_search {
            params.push(("kp", "1"));
        }

        let response = client
            .post(&self.html_url)
            .form(&params)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("DuckDuckGo HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo HTML received");

        parse_results_html(&html, config.max_results)
    }

    /// Extract the actual URL from DuckDuckGo's redirect wrapper.
    ///
    /// DDG wraps URLs like `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=…`;
    /// the `uddg` query parameter holds the destination.
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }
}

impl Provider for WebProvider {
    type Item = WebResult;

    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<WebResult>, SearchError> {
        match self.instant_answer(query, config).await {
            Ok(results) if !results.is_empty() => return Ok(results),
            Ok(_) => {
                tracing::debug!(query, "instant answer empty, falling back to HTML");
            }
            Err(err) => {
                tracing::warn!(error = %err, "instant answer failed, falling back to HTML");
            }
        }
        self.scrape_html(query, config).await
    }

    fn category(&self) -> SearchCategory {
        SearchCategory::Web
    }
}

// ── Instant Answer JSON ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// A related topic is either a plain link or a named group of links.
#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "FirstURL", default)]
    first_url: String,
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "Topics", default)]
    topics: Vec<RelatedTopic>,
}

/// Parse the Instant Answer JSON body into web results.
///
/// The abstract (when present) becomes the first result; related topics
/// follow, with nested topic groups flattened.
pub(crate) fn parse_instant_answer(
    body: &str,
    max_results: usize,
) -> Result<Vec<WebResult>, SearchError> {
    let answer: InstantAnswer = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("instant answer JSON invalid: {e}")))?;

    let mut results = Vec::new();

    if !answer.abstract_text.is_empty() && !answer.abstract_url.is_empty() {
        results.push(WebResult {
            title: if answer.heading.is_empty() {
                answer.abstract_url.clone()
            } else {
                answer.heading.clone()
            },
            url: answer.abstract_url.clone(),
            snippet: answer.abstract_text.clone(),
            source: SOURCE_API.into(),
        });
    }

    collect_topics(&answer.related_topics, &mut results, max_results);
    results.truncate(max_results);

    tracing::debug!(count = results.len(), "instant answer results parsed");
    Ok(results)
}

/// Flatten related topics (including nested groups) into `out`.
fn collect_topics(topics: &[RelatedTopic], out: &mut Vec<WebResult>, max_results: usize) {
    for topic in topics {
        if out.len() >= max_results {
            return;
        }
        if !topic.topics.is_empty() {
            collect_topics(&topic.topics, out, max_results);
            continue;
        }
        if topic.first_url.is_empty() || topic.text.is_empty() {
            continue;
        }
        // Topic text reads "Title - description"; split once where possible.
        let (title, snippet) = match topic.text.split_once(" - ") {
            Some((t, s)) => (t.to_owned(), s.to_owned()),
            None => (topic.text.clone(), String::new()),
        };
        out.push(WebResult {
            title,
            url: topic.first_url.clone(),
            snippet,
            source: SOURCE_API.into(),
        });
    }
}

// ── HTML results page ───────────────────────────────────────────────

/// Parse the DuckDuckGo HTML results page into web results.
///
/// Extracted as a separate function for testability with mock HTML.
pub(crate) fn parse_results_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<WebResult>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let Some(href) = title_el.value().attr("href") else {
            continue;
        };

        let Some(url) = WebProvider::extract_url(href) else {
            continue;
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(WebResult {
            title,
            url,
            snippet,
            source: SOURCE_HTML.into(),
        });

        if results.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = results.len(), "DuckDuckGo HTML results parsed");
    Ok(results)
}
