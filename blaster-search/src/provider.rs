//! Trait definition for pluggable search providers.
//!
//! Each category backend (DuckDuckGo, the image chain, YouTube, Google News
//! RSS, Twitter) implements [`Provider`] over its own result type, giving a
//! uniform seam for the orchestrator and for mocking in tests.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::SearchCategory;

/// A pluggable search provider for one category.
///
/// Implementors fetch from an external backend and map the response into
/// this crate's flat result shapes. Each provider handles its own:
///
/// - URL construction with query encoding
/// - HTTP request with appropriate headers or auth
/// - Response parsing (JSON, HTML via CSS selectors, or regex)
/// - Fallback to the next backend in its chain, where one exists
///
/// All implementations must be `Send + Sync` for concurrent fan-out.
pub trait Provider: Send + Sync {
    /// The flat result type this provider yields.
    type Item;

    /// Perform a search and return parsed results, truncated to
    /// `config.max_results`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when every backend in the provider's chain
    /// fails. Providers that substitute generated data never fail.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<Self::Item>, SearchError>> + Send;

    /// Returns which [`SearchCategory`] this provider serves.
    fn category(&self) -> SearchCategory;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProvider {
        items: Vec<&'static str>,
    }

    impl Provider for MockProvider {
        type Item = String;

        async fn search(
            &self,
            _query: &str,
            _config: &SearchConfig,
        ) -> Result<Vec<String>, SearchError> {
            if self.items.is_empty() {
                return Err(SearchError::Parse("mock provider failure".into()));
            }
            Ok(self.items.iter().map(|s| (*s).to_owned()).collect())
        }

        fn category(&self) -> SearchCategory {
            SearchCategory::Web
        }
    }

    #[test]
    fn mock_provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockProvider>();
    }

    #[tokio::test]
    async fn mock_provider_returns_items() {
        let provider = MockProvider {
            items: vec!["one", "two"],
        };
        let results = provider
            .search("test", &SearchConfig::default())
            .await
            .expect("should succeed");
        assert_eq!(results, vec!["one".to_owned(), "two".to_owned()]);
        assert_eq!(provider.category(), SearchCategory::Web);
    }

    #[tokio::test]
    async fn mock_provider_propagates_errors() {
        let provider = MockProvider { items: vec![] };
        let result = provider.search("test", &SearchConfig::default()).await;
        assert!(result.is_err());
    }
}
