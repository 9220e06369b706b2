//! Answer synthesis: search, crawl a few result pages, ask the LLM.
//!
//! The pipeline is a straight line — web search, then a concurrent crawl
//! of the top results, then one chat-completion call. Every stage
//! degrades instead of failing: no crawlable pages means answering from
//! snippets, and no LLM (or a failed call) means an extractive summary.

use blaster_search::{crawl_page, PageContent, Provider, SearchProviders, WebResult};
use futures_util::future::join_all;
use serde::Serialize;

use crate::config::BlasterConfig;
use crate::error::BlasterError;
use crate::llm::{prompt, DeepSeekClient};

/// A numbered source backing an answer.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    /// 1-based citation index.
    pub index: usize,
    /// Page or result title.
    pub title: String,
    /// Page URL.
    pub url: String,
}

/// A synthesized answer with its citations.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// The question asked.
    pub query: String,
    /// Answer text with `[n]` citations.
    pub answer: String,
    /// Model that produced the answer; `None` for the extractive fallback.
    pub model: Option<String>,
    /// Sources in citation order.
    pub sources: Vec<SourceRef>,
    /// How many result pages were crawled successfully.
    pub pages_crawled: usize,
}

/// Answer `query` by searching, crawling and synthesizing.
///
/// # Errors
///
/// Returns [`BlasterError::InvalidRequest`] for an empty query. Provider
/// and LLM failures degrade to snippet-based answers instead of erroring.
pub async fn answer_query(
    query: &str,
    providers: &SearchProviders,
    llm: Option<&DeepSeekClient>,
    config: &BlasterConfig,
) -> Result<Answer, BlasterError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(BlasterError::InvalidRequest("query is required".into()));
    }

    let search_config = config.search_config();

    let results = match providers.web.search(query, &search_config).await {
        Ok(results) => results,
        Err(err) => {
            tracing::warn!(error = %err, "web search failed, answering without results");
            Vec::new()
        }
    };

    if results.is_empty() {
        return Ok(Answer {
            query: query.to_owned(),
            answer: format!("No search results found for \"{query}\"."),
            model: None,
            sources: Vec::new(),
            pages_crawled: 0,
        });
    }

    let pages = crawl_top_results(&results, config).await;
    tracing::debug!(results = results.len(), pages = pages.len(), "crawl finished");

    // Pages that failed to crawl still count as snippet-only sources.
    let (sources, answer, model) = if let Some(client) = llm {
        match synthesize_with_llm(query, client, &pages, &results, config).await {
            Ok((sources, text)) => (sources, text, Some(client.model().to_owned())),
            Err(err) => {
                tracing::warn!(error = %err, "LLM synthesis failed, using extractive fallback");
                let (sources, text) = extractive_answer(&pages, &results);
                (sources, text, None)
            }
        }
    } else {
        let (sources, text) = extractive_answer(&pages, &results);
        (sources, text, None)
    };

    Ok(Answer {
        query: query.to_owned(),
        answer,
        model,
        sources,
        pages_crawled: pages.len(),
    })
}

/// Crawl up to `config.crawl.max_pages` of the top results concurrently.
async fn crawl_top_results(results: &[WebResult], config: &BlasterConfig) -> Vec<PageContent> {
    let search_config = config.search_config();
    let futures = results
        .iter()
        .take(config.crawl.max_pages)
        .map(|result| {
            let url = result.url.clone();
            let search_config = search_config.clone();
            let max_chars = config.crawl.max_chars_per_page;
            async move {
                match crawl_page(&url, &search_config, max_chars).await {
                    Ok(page) => Some(page),
                    Err(err) => {
                        tracing::warn!(url, error = %err, "page crawl failed");
                        None
                    }
                }
            }
        });

    join_all(futures).await.into_iter().flatten().collect()
}

/// Ask the LLM for a cited answer over the crawled pages.
///
/// Falls back to snippet sources when nothing crawled; the model still
/// gets something to cite.
async fn synthesize_with_llm(
    query: &str,
    client: &DeepSeekClient,
    pages: &[PageContent],
    results: &[WebResult],
    config: &BlasterConfig,
) -> Result<(Vec<SourceRef>, String), BlasterError> {
    let effective_pages: Vec<PageContent> = if pages.is_empty() {
        snippet_pages(results, config.crawl.max_pages)
    } else {
        pages.to_vec()
    };

    let messages = prompt::build_messages(query, &effective_pages, config.crawl.max_chars_per_page);
    let text = client.complete(&messages).await?;
    Ok((source_refs(&effective_pages), text))
}

/// Extractive fallback: the leading sentences of each source.
fn extractive_answer(pages: &[PageContent], results: &[WebResult]) -> (Vec<SourceRef>, String) {
    let effective_pages: Vec<PageContent> = if pages.is_empty() {
        snippet_pages(results, results.len())
    } else {
        pages.to_vec()
    };

    let mut parts = Vec::new();
    for (i, page) in effective_pages.iter().enumerate() {
        let lead = leading_sentences(&page.text, 2);
        if !lead.is_empty() {
            parts.push(format!("{lead} [{}]", i + 1));
        }
    }

    let answer = if parts.is_empty() {
        "The crawled pages contained no readable text.".to_owned()
    } else {
        parts.join(" ")
    };

    (source_refs(&effective_pages), answer)
}

/// Treat result snippets as single-paragraph pages.
fn snippet_pages(results: &[WebResult], limit: usize) -> Vec<PageContent> {
    results
        .iter()
        .take(limit)
        .filter(|r| !r.snippet.is_empty())
        .map(|r| PageContent {
            url: r.url.clone(),
            title: r.title.clone(),
            text: r.snippet.clone(),
            word_count: r.snippet.split_whitespace().count(),
        })
        .collect()
}

/// Number the sources in page order.
fn source_refs(pages: &[PageContent]) -> Vec<SourceRef> {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| SourceRef {
            index: i + 1,
            title: if page.title.is_empty() {
                page.url.clone()
            } else {
                page.title.clone()
            },
            url: page.url.clone(),
        })
        .collect()
}

/// First `n` sentences of `text`, capped at 400 chars.
fn leading_sentences(text: &str, n: usize) -> String {
    let mut out = String::new();
    let mut count = 0;
    for chunk in text.split_inclusive(['.', '!', '?']) {
        out.push_str(chunk);
        count += 1;
        if count >= n || out.len() >= 400 {
            break;
        }
    }
    let trimmed = out.trim();
    if trimmed.len() > 400 {
        let mut end = 400;
        while !trimmed.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, title: &str, text: &str) -> PageContent {
        PageContent {
            url: url.into(),
            title: title.into(),
            text: text.into(),
            word_count: text.split_whitespace().count(),
        }
    }

    fn result(url: &str, title: &str, snippet: &str) -> WebResult {
        WebResult {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            source: "duckduckgo-html".into(),
        }
    }

    #[test]
    fn extractive_answer_cites_each_page() {
        let pages = vec![
            page("https://a.com", "A", "Alpha is first. It is early. More detail follows."),
            page("https://b.com", "B", "Beta is second."),
        ];
        let (sources, text) = extractive_answer(&pages, &[]);
        assert_eq!(sources.len(), 2);
        assert!(text.contains("[1]"));
        assert!(text.contains("[2]"));
        assert!(text.contains("Alpha is first. It is early."));
        assert!(!text.contains("More detail follows"));
    }

    #[test]
    fn extractive_answer_falls_back_to_snippets() {
        let results = vec![result("https://a.com", "A", "Snippet text here.")];
        let (sources, text) = extractive_answer(&[], &results);
        assert_eq!(sources.len(), 1);
        assert!(text.contains("Snippet text here."));
    }

    #[test]
    fn snippet_pages_skip_empty_snippets() {
        let results = vec![
            result("https://a.com", "A", ""),
            result("https://b.com", "B", "has text"),
        ];
        let pages = snippet_pages(&results, 5);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].url, "https://b.com");
    }

    #[test]
    fn source_refs_number_from_one() {
        let pages = vec![page("https://a.com", "A", "x"), page("https://b.com", "", "y")];
        let refs = source_refs(&pages);
        assert_eq!(refs[0].index, 1);
        assert_eq!(refs[1].index, 2);
        // Untitled pages fall back to the URL.
        assert_eq!(refs[1].title, "https://b.com");
    }

    #[test]
    fn leading_sentences_respects_count() {
        let text = "One. Two! Three? Four.";
        assert_eq!(leading_sentences(text, 2), "One. Two!");
    }

    #[test]
    fn leading_sentences_caps_length() {
        let text = format!("{}.", "word ".repeat(200));
        let lead = leading_sentences(&text, 3);
        assert!(lead.len() <= 404);
    }

    #[tokio::test]
    async fn empty_query_rejected() {
        let providers = SearchProviders::new(None, None, None);
        let config = BlasterConfig::default();
        let result = answer_query("   ", &providers, None, &config).await;
        assert!(matches!(result, Err(BlasterError::InvalidRequest(_))));
    }
}
