//! Tweet search — Twitter API v2 recent search, or generated data.
//!
//! With a bearer token configured, queries `/2/tweets/search/recent` and
//! joins tweets to their authors via the `author_id` expansion. Without a
//! token, or when the API call fails, generated tweets stand in so the UI
//! always has something to render.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::Provider;
use crate::types::{SearchCategory, Tweet};
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;

/// The recent-search endpoint rejects `max_results` below this value.
const API_MIN_RESULTS: usize = 10;

/// Twitter API v2 provider with a generated-data fallback.
pub struct TwitterProvider {
    bearer_token: Option<String>,
    base_url: String,
}

impl TwitterProvider {
    /// Create a provider. With `None` the provider only generates data.
    pub fn new(bearer_token: Option<String>) -> Self {
        Self {
            bearer_token,
            base_url: "https://api.twitter.com".into(),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Query the v2 recent-search endpoint.
    async fn api_search(
        &self,
        token: &str,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<Tweet>, SearchError> {
        tracing::trace!(query, "Twitter recent search");

        let client = http::build_client(config)?;
        let max_results = config.max_results.max(API_MIN_RESULTS).to_string();
        let response = client
            .get(format!("{}/2/tweets/search/recent", self.base_url))
            .query(&[
                ("query", query),
                ("max_results", max_results.as_str()),
                ("tweet.fields", "created_at,public_metrics,author_id"),
                ("expansions", "author_id"),
                ("user.fields", "name,username"),
            ])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Twitter request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Twitter HTTP error: {e}")))?;

        let body: RecentSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("Twitter JSON invalid: {e}")))?;

        let users: HashMap<&str, &ApiUser> = body
            .includes
            .as_ref()
            .map(|inc| {
                inc.users
                    .iter()
                    .map(|u| (u.id.as_str(), u))
                    .collect()
            })
            .unwrap_or_default();

        let tweets: Vec<Tweet> = body
            .data
            .iter()
            .take(config.max_results)
            .map(|t| {
                let user = t.author_id.as_deref().and_then(|id| users.get(id));
                let username = user.map(|u| u.username.clone()).unwrap_or_default();
                let url = if username.is_empty() {
                    format!("https://twitter.com/i/status/{}", t.id)
                } else {
                    format!("https://twitter.com/{username}/status/{}", t.id)
                };
                Tweet {
                    id: t.id.clone(),
                    text: t.text.clone(),
                    author_name: user.map(|u| u.name.clone()).unwrap_or_default(),
                    author_username: username,
                    created_at: t.created_at.clone().unwrap_or_default(),
                    like_count: t.public_metrics.like_count,
                    retweet_count: t.public_metrics.retweet_count,
                    reply_count: t.public_metrics.reply_count,
                    url,
                }
            })
            .collect();

        tracing::debug!(count = tweets.len(), "Twitter results mapped");
        Ok(tweets)
    }
}

impl Provider for TwitterProvider {
    type Item = Tweet;

    async fn search(&self, query: &str, config: &SearchConfig) -> Result<Vec<Tweet>, SearchError> {
        let Some(token) = self.bearer_token.clone() else {
            tracing::debug!(query, "no bearer token, generating tweets");
            return Ok(mock_tweets(query, config.max_results));
        };

        match self.api_search(&token, query, config).await {
            Ok(tweets) => Ok(tweets),
            Err(err) => {
                tracing::warn!(error = %err, "Twitter API failed, generating tweets");
                Ok(mock_tweets(query, config.max_results))
            }
        }
    }

    fn category(&self) -> SearchCategory {
        SearchCategory::Twitter
    }
}

// ── API response shapes ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RecentSearchResponse {
    #[serde(default)]
    data: Vec<ApiTweet>,
    includes: Option<ApiIncludes>,
}

#[derive(Debug, Deserialize)]
struct ApiTweet {
    id: String,
    text: String,
    author_id: Option<String>,
    created_at: Option<String>,
    #[serde(default)]
    public_metrics: ApiMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct ApiMetrics {
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    reply_count: u64,
}

#[derive(Debug, Deserialize)]
struct ApiIncludes {
    #[serde(default)]
    users: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    name: String,
    username: String,
}

// ── Generated tweets ────────────────────────────────────────────────

const MOCK_AUTHORS: &[(&str, &str)] = &[
    ("techwatcher", "Tech Watcher"),
    ("daily_dev", "Daily Dev"),
    ("newsroundup", "News Roundup"),
    ("opinionated_io", "Opinionated"),
    ("trendspotting", "Trend Spotting"),
];

const MOCK_TEMPLATES: &[&str] = &[
    "Just read a great thread about {q}. Worth your time.",
    "Hot take: {q} is overhyped and everyone knows it.",
    "Can't believe how fast {q} is moving this year. Amazing progress!",
    "Anyone else following {q}? The latest updates look terrible to me.",
    "New post: everything you need to know about {q}.",
    "{q} keeps showing up in my feed. Love to see it.",
    "Honestly disappointed by the discourse around {q} lately.",
    "Weekend project: finally digging into {q}. Excited!",
];

/// Generate plausible tweets for `query`.
///
/// Ids are unique within the batch, timestamps step back into the past,
/// and engagement counts are randomised. Used whenever the real API is
/// unavailable.
pub fn mock_tweets(query: &str, count: usize) -> Vec<Tweet> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    (0..count)
        .map(|i| {
            let (username, name) = MOCK_AUTHORS[i % MOCK_AUTHORS.len()];
            let template = MOCK_TEMPLATES[i % MOCK_TEMPLATES.len()];
            // Batch index keeps ids unique even when the random part repeats.
            let id = format!("19{:013}{:03}", rng.gen_range(0u64..10_000_000_000_000), i);
            Tweet {
                text: template.replace("{q}", query),
                author_username: username.into(),
                author_name: name.into(),
                created_at: (now - Duration::minutes(7 * i as i64)).to_rfc3339(),
                like_count: rng.gen_range(0..2_000),
                retweet_count: rng.gen_range(0..500),
                reply_count: rng.gen_range(0..200),
                url: format!("https://twitter.com/{username}/status/{id}"),
                id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_API_JSON: &str = r#"{
        "data": [
            {
                "id": "1690000000000000001",
                "text": "Shipping the rewrite today!",
                "author_id": "42",
                "created_at": "2026-08-06T12:00:00.000Z",
                "public_metrics": {"retweet_count": 5, "reply_count": 2, "like_count": 31, "quote_count": 1}
            },
            {
                "id": "1690000000000000002",
                "text": "No author on this one",
                "created_at": "2026-08-06T11:00:00.000Z",
                "public_metrics": {"retweet_count": 0, "reply_count": 0, "like_count": 1, "quote_count": 0}
            }
        ],
        "includes": {
            "users": [
                {"id": "42", "name": "Alice Example", "username": "alice"}
            ]
        },
        "meta": {"result_count": 2}
    }"#;

    #[test]
    fn api_response_joins_authors() {
        let body: RecentSearchResponse = serde_json::from_str(MOCK_API_JSON).expect("parse");
        assert_eq!(body.data.len(), 2);
        let users = body.includes.as_ref().expect("includes");
        assert_eq!(users.users[0].username, "alice");
        assert_eq!(body.data[0].public_metrics.like_count, 31);
        assert!(body.data[1].author_id.is_none());
    }

    #[tokio::test]
    async fn missing_token_yields_generated_tweets() {
        let provider = TwitterProvider::new(None);
        let config = SearchConfig::default();
        let tweets = provider.search("rust", &config).await.expect("ok");
        assert_eq!(tweets.len(), config.max_results);
        assert!(tweets.iter().all(|t| t.text.contains("rust")));
    }

    #[tokio::test]
    async fn unreachable_api_falls_back_to_generated_tweets() {
        let provider =
            TwitterProvider::new(Some("token".into())).with_base_url("http://127.0.0.1:1");
        let config = SearchConfig {
            timeout_seconds: 1,
            max_results: 5,
            ..Default::default()
        };
        let tweets = provider.search("fallback", &config).await.expect("ok");
        assert_eq!(tweets.len(), 5);
    }

    #[test]
    fn mock_tweet_ids_unique_within_batch() {
        let tweets = mock_tweets("anything", 20);
        let ids: std::collections::HashSet<_> = tweets.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), tweets.len());
    }

    #[test]
    fn mock_tweets_carry_query_text() {
        let tweets = mock_tweets("quantum widgets", 8);
        assert!(tweets.iter().all(|t| t.text.contains("quantum widgets")));
        assert!(tweets.iter().all(|t| !t.author_username.is_empty()));
    }

    #[test]
    fn mock_tweet_timestamps_step_backwards() {
        let tweets = mock_tweets("time", 3);
        assert!(tweets[0].created_at > tweets[1].created_at);
        assert!(tweets[1].created_at > tweets[2].created_at);
    }

    #[test]
    fn mock_tweets_zero_count_is_empty() {
        assert!(mock_tweets("none", 0).is_empty());
    }

    #[test]
    fn provider_category_is_twitter() {
        assert_eq!(TwitterProvider::new(None).category(), SearchCategory::Twitter);
    }
}
