//! Configuration for the Blaster server and companion tools.
//!
//! Settings load from an optional `blaster.toml` next to the binary, with
//! every field defaulted so an empty (or absent) file works out of the
//! box. Credentials are read from the environment and override anything
//! in the file, so keys never need to live on disk.

use blaster_search::config::{MAX_CRAWL_PAGES, MAX_RESULTS};
use blaster_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlasterConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Search behaviour.
    pub search: SearchSettings,
    /// Page-crawl budget for answer synthesis.
    pub crawl: CrawlSettings,
    /// LLM provider settings.
    pub llm: LlmSettings,
    /// Provider credentials (environment variables override these).
    pub credentials: Credentials,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

/// Search behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results per category, at most 20.
    pub max_results: usize,
    /// Per-provider timeout in seconds.
    pub timeout_seconds: u64,
    /// Request safe-search filtering where supported.
    pub safe_search: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULTS,
            timeout_seconds: 8,
            safe_search: true,
        }
    }
}

/// Page-crawl budget for answer synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Result pages fetched per answer, at most 3.
    pub max_pages: usize,
    /// Characters of extracted text kept per page for the prompt.
    pub max_chars_per_page: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_pages: MAX_CRAWL_PAGES,
            max_chars_per_page: 4_000,
        }
    }
}

/// LLM provider settings (DeepSeek chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API base URL.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Completion token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".into(),
            model: "deepseek-chat".into(),
            max_tokens: 1024,
            temperature: 0.3,
        }
    }
}

/// Optional provider credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Unsplash access key (`UNSPLASH_ACCESS_KEY`).
    pub unsplash_access_key: Option<String>,
    /// Pexels API key (`PEXELS_API_KEY`).
    pub pexels_api_key: Option<String>,
    /// Twitter API v2 bearer token (`TWITTER_BEARER_TOKEN`).
    pub twitter_bearer_token: Option<String>,
    /// DeepSeek API key (`DEEPSEEK_API_KEY`). Without it, `/api/crawl`
    /// answers with the extractive fallback.
    pub deepseek_api_key: Option<String>,
}

impl BlasterConfig {
    /// Load configuration: `blaster.toml` if present, then environment
    /// overrides for credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            toml::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Overlay credentials from the environment.
    pub fn apply_env(&mut self) {
        let env_override = |current: &mut Option<String>, var: &str| {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    *current = Some(value);
                }
            }
        };
        env_override(&mut self.credentials.unsplash_access_key, "UNSPLASH_ACCESS_KEY");
        env_override(&mut self.credentials.pexels_api_key, "PEXELS_API_KEY");
        env_override(&mut self.credentials.twitter_bearer_token, "TWITTER_BEARER_TOKEN");
        env_override(&mut self.credentials.deepseek_api_key, "DEEPSEEK_API_KEY");
    }

    /// Derive the search-crate config from these settings.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_results: self.search.max_results,
            timeout_seconds: self.search.timeout_seconds,
            safe_search: self.search.safe_search,
            user_agent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = BlasterConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.search.max_results, 20);
        assert_eq!(config.crawl.max_pages, 3);
        assert_eq!(config.llm.model, "deepseek-chat");
        assert!(config.credentials.deepseek_api_key.is_none());
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let config: BlasterConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.search.timeout_seconds, 8);
    }

    #[test]
    fn partial_toml_overrides_one_section() {
        let raw = r#"
            [server]
            port = 3000

            [crawl]
            max_pages = 2
        "#;
        let config: BlasterConfig = toml::from_str(raw).expect("partial config parses");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.crawl.max_pages, 2);
        // Untouched sections keep defaults.
        assert_eq!(config.search.max_results, 20);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = BlasterConfig::load("/nonexistent/blaster.toml").expect("load");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn search_config_mirrors_settings() {
        let mut config = BlasterConfig::default();
        config.search.max_results = 7;
        config.search.safe_search = false;
        let sc = config.search_config();
        assert_eq!(sc.max_results, 7);
        assert!(!sc.safe_search);
    }
}
