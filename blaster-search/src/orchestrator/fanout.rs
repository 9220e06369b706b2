//! Bounded fan-out across queries and categories.
//!
//! Issues every (query × category) fetch concurrently, waits for all of
//! them, and continues with whatever succeeded. A failed category is
//! logged at warn level and comes back as an empty list; there is no
//! retry, no cancellation and no shared state across the fan-out.

use futures::future::join_all;
use serde::Serialize;

use crate::config::{SearchConfig, MAX_QUERIES};
use crate::error::SearchError;
use crate::provider::Provider;
use crate::providers::{ImagesProvider, NewsProvider, TwitterProvider, VideosProvider, WebProvider};
use crate::types::{ImageResult, NewsResult, SearchCategory, Tweet, VideoResult, WebResult};

use super::dedup::{dedup_by_key, normalize_url};

/// One provider instance per category, shared across requests.
pub struct SearchProviders {
    pub web: WebProvider,
    pub images: ImagesProvider,
    pub videos: VideosProvider,
    pub news: NewsProvider,
    pub twitter: TwitterProvider,
}

impl SearchProviders {
    /// Build the full provider set from optional credentials.
    pub fn new(
        unsplash_access_key: Option<String>,
        pexels_api_key: Option<String>,
        twitter_bearer_token: Option<String>,
    ) -> Self {
        Self {
            web: WebProvider::new(),
            images: ImagesProvider::new(unsplash_access_key, pexels_api_key),
            videos: VideosProvider::new(),
            news: NewsProvider::new(),
            twitter: TwitterProvider::new(twitter_bearer_token),
        }
    }
}

/// Aggregated results for one query. Categories that were not requested
/// (or whose provider failed) are empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResults {
    pub query: String,
    pub web: Vec<WebResult>,
    pub images: Vec<ImageResult>,
    pub videos: Vec<VideoResult>,
    pub news: Vec<NewsResult>,
    pub tweets: Vec<Tweet>,
}

/// Run up to [`MAX_QUERIES`] queries, each fanned out across `categories`.
///
/// # Errors
///
/// Returns [`SearchError::Config`] when the query list is empty or too
/// long, or when `config` is invalid. Provider failures never surface
/// here — the affected category is simply empty.
pub async fn search_queries(
    providers: &SearchProviders,
    queries: &[String],
    categories: &[SearchCategory],
    config: &SearchConfig,
) -> Result<Vec<QueryResults>, SearchError> {
    config.validate()?;
    if queries.is_empty() {
        return Err(SearchError::Config("at least one query is required".into()));
    }
    if queries.len() > MAX_QUERIES {
        return Err(SearchError::Config(format!(
            "at most {MAX_QUERIES} queries per request"
        )));
    }

    let futures = queries
        .iter()
        .map(|query| search_one(providers, query, categories, config));
    Ok(join_all(futures).await)
}

/// Fan one query out across the requested categories concurrently.
pub async fn search_one(
    providers: &SearchProviders,
    query: &str,
    categories: &[SearchCategory],
    config: &SearchConfig,
) -> QueryResults {
    let wants = |cat: SearchCategory| categories.contains(&cat);

    let (web, images, videos, news, tweets) = tokio::join!(
        fetch_category(&providers.web, query, config, wants(SearchCategory::Web)),
        fetch_category(&providers.images, query, config, wants(SearchCategory::Images)),
        fetch_category(&providers.videos, query, config, wants(SearchCategory::Videos)),
        fetch_category(&providers.news, query, config, wants(SearchCategory::News)),
        fetch_category(&providers.twitter, query, config, wants(SearchCategory::Twitter)),
    );

    let mut results = QueryResults {
        query: query.to_owned(),
        web: dedup_by_key(web, |r: &WebResult| normalize_url(&r.url)),
        images: dedup_by_key(images, |r: &ImageResult| r.url.clone()),
        videos: dedup_by_key(videos, |r: &VideoResult| r.video_id.clone()),
        news: dedup_by_key(news, |r: &NewsResult| normalize_url(&r.url)),
        tweets: dedup_by_key(tweets, |t: &Tweet| t.id.clone()),
    };

    results.web.truncate(config.max_results);
    results.images.truncate(config.max_results);
    results.videos.truncate(config.max_results);
    results.news.truncate(config.max_results);
    results.tweets.truncate(config.max_results);
    results
}

/// Run one provider, mapping "not requested" and "failed" both to empty.
async fn fetch_category<P: Provider>(
    provider: &P,
    query: &str,
    config: &SearchConfig,
    requested: bool,
) -> Vec<P::Item> {
    if !requested {
        return Vec::new();
    }
    match provider.search(query, config).await {
        Ok(items) => {
            tracing::debug!(category = %provider.category(), count = items.len(), "category fetched");
            items
        }
        Err(err) => {
            tracing::warn!(category = %provider.category(), error = %err, "category failed");
            Vec::new()
        }
    }
}
