//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls result limits, timeouts and request behaviour.
//! Provider credentials and base URLs live on the provider structs, not
//! here, so one config can drive every category.

use crate::error::SearchError;

/// Hard ceiling on results per category in one response.
pub const MAX_RESULTS: usize = 20;

/// Hard ceiling on queries handled in one request.
pub const MAX_QUERIES: usize = 5;

/// Hard ceiling on result pages crawled for one answer.
pub const MAX_CRAWL_PAGES: usize = 3;

/// Configuration for a search operation.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of results per category, capped at [`MAX_RESULTS`].
    pub max_results: usize,
    /// Per-provider HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to request safe-search filtering from backends that support it.
    pub safe_search: bool,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULTS,
            timeout_seconds: 8,
            safe_search: true,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0 and at most [`MAX_RESULTS`]
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.max_results > MAX_RESULTS {
            return Err(SearchError::Config(format!(
                "max_results must be at most {MAX_RESULTS}"
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
