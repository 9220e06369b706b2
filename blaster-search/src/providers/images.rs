//! Image search — Unsplash, then Pexels, then a Google Images scrape.
//!
//! The two API backends need keys; a backend with no key configured is
//! skipped. The Google fallback scrapes image URLs out of the results page
//! with a regex, since the interesting data sits inside inline script
//! blocks that CSS selectors cannot reach. First backend to return
//! anything wins; if every backend fails the category comes back empty.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::Provider;
use crate::types::{ImageResult, SearchCategory};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Image search provider with a three-step fallback chain.
pub struct ImagesProvider {
    unsplash_access_key: Option<String>,
    pexels_api_key: Option<String>,
    unsplash_url: String,
    pexels_url: String,
    google_url: String,
}

impl ImagesProvider {
    /// Create a provider. Backends with a `None` key are skipped.
    pub fn new(unsplash_access_key: Option<String>, pexels_api_key: Option<String>) -> Self {
        Self {
            unsplash_access_key,
            pexels_api_key,
            unsplash_url: "https://api.unsplash.com".into(),
            pexels_url: "https://api.pexels.com".into(),
            google_url: "https://www.google.com".into(),
        }
    }

    /// Override the Unsplash API base URL.
    pub fn with_unsplash_url(mut self, url: impl Into<String>) -> Self {
        self.unsplash_url = url.into();
        self
    }

    /// Override the Pexels API base URL.
    pub fn with_pexels_url(mut self, url: impl Into<String>) -> Self {
        self.pexels_url = url.into();
        self
    }

    /// Override the Google base URL.
    pub fn with_google_url(mut self, url: impl Into<String>) -> Self {
        self.google_url = url.into();
        self
    }

    async fn unsplash(
        &self,
        key: &str,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<ImageResult>, SearchError> {
        tracing::trace!(query, "Unsplash search");

        let client = http::build_client(config)?;
        let per_page = config.max_results.to_string();
        let response = client
            .get(format!("{}/search/photos", self.unsplash_url))
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .header("Authorization", format!("Client-ID {key}"))
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Unsplash request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Unsplash HTTP error: {e}")))?;

        let body: UnsplashResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("Unsplash JSON invalid: {e}")))?;

        let results: Vec<ImageResult> = body
            .results
            .into_iter()
            .take(config.max_results)
            .map(|photo| ImageResult {
                url: photo.urls.regular,
                thumbnail: photo.urls.thumb,
                alt: photo.alt_description.unwrap_or_default(),
                link: photo.links.html,
                photographer: photo.user.name,
                source: "unsplash".into(),
            })
            .collect();

        tracing::debug!(count = results.len(), "Unsplash results parsed");
        Ok(results)
    }

    async fn pexels(
        &self,
        key: &str,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<ImageResult>, SearchError> {
        tracing::trace!(query, "Pexels search");

        let client = http::build_client(config)?;
        let per_page = config.max_results.to_string();
        let response = client
            .get(format!("{}/v1/search", self.pexels_url))
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .header("Authorization", key)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Pexels request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Pexels HTTP error: {e}")))?;

        let body: PexelsResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("Pexels JSON invalid: {e}")))?;

        let results: Vec<ImageResult> = body
            .photos
            .into_iter()
            .take(config.max_results)
            .map(|photo| ImageResult {
                url: photo.src.large,
                thumbnail: photo.src.tiny,
                alt: photo.alt.unwrap_or_default(),
                link: photo.url,
                photographer: photo.photographer,
                source: "pexels".into(),
            })
            .collect();

        tracing::debug!(count = results.len(), "Pexels results parsed");
        Ok(results)
    }

    async fn google_images(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<ImageResult>, SearchError> {
        tracing::trace!(query, "Google Images scrape");

        let client = http::build_client(config)?;
        let response = client
            .get(format!("{}/search", self.google_url))
            .query(&[("q", query), ("tbm", "isch"), ("hl", "en")])
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Google Images request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Google Images HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("Google Images read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "Google Images response received");

        let search_page = format!("{}/search?q={}&tbm=isch", self.google_url, query);
        Ok(parse_google_images_html(
            &html,
            &search_page,
            config.max_results,
        ))
    }
}

impl Provider for ImagesProvider {
    type Item = ImageResult;

    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<ImageResult>, SearchError> {
        if let Some(key) = self.unsplash_access_key.as_deref() {
            match self.unsplash(key, query, config).await {
                Ok(results) if !results.is_empty() => return Ok(results),
                Ok(_) => tracing::debug!("Unsplash returned no photos, trying Pexels"),
                Err(err) => tracing::warn!(error = %err, "Unsplash failed, trying Pexels"),
            }
        }

        if let Some(key) = self.pexels_api_key.as_deref() {
            match self.pexels(key, query, config).await {
                Ok(results) if !results.is_empty() => return Ok(results),
                Ok(_) => tracing::debug!("Pexels returned no photos, trying Google"),
                Err(err) => tracing::warn!(error = %err, "Pexels failed, trying Google"),
            }
        }

        match self.google_images(query, config).await {
            Ok(results) => Ok(results),
            Err(err) => {
                tracing::warn!(error = %err, "Google Images scrape failed");
                // End of the chain: an empty category, not a hard failure.
                Ok(Vec::new())
            }
        }
    }

    fn category(&self) -> SearchCategory {
        SearchCategory::Images
    }
}

// ── API response shapes ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UnsplashResponse {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    #[serde(default)]
    alt_description: Option<String>,
    urls: UnsplashUrls,
    links: UnsplashLinks,
    user: UnsplashUser,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    regular: String,
    thumb: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashLinks {
    html: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    url: String,
    photographer: String,
    #[serde(default)]
    alt: Option<String>,
    src: PexelsSrc,
}

#[derive(Debug, Deserialize)]
struct PexelsSrc {
    large: String,
    tiny: String,
}

// ── Google Images scrape ────────────────────────────────────────────

/// Matches image URLs embedded in the results page script blocks as
/// `["https://…/photo.jpg",height,width]`.
fn image_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\["(https?://[^"]+?\.(?:jpg|jpeg|png|gif|webp))",\d+,\d+\]"#)
            .expect("image URL regex is valid")
    })
}

/// Pull image URLs out of the Google Images results page.
///
/// Thumbnails hosted on gstatic are skipped in favour of origin URLs;
/// duplicates are dropped, order preserved.
pub(crate) fn parse_google_images_html(
    html: &str,
    search_page: &str,
    max_results: usize,
) -> Vec<ImageResult> {
    let mut seen = std::collections::HashSet::new();
    let mut results = Vec::new();

    for caps in image_url_regex().captures_iter(html) {
        let url = caps[1].to_owned();
        if url.contains("gstatic.com") || url.contains("googleusercontent.com") {
            continue;
        }
        if !seen.insert(url.clone()) {
            continue;
        }
        results.push(ImageResult {
            thumbnail: url.clone(),
            url,
            alt: String::new(),
            link: search_page.to_owned(),
            photographer: String::new(),
            source: "google".into(),
        });
        if results.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Google Images results parsed");
    results
}
