//! Error type for the blaster application crate.

use blaster_search::SearchError;

/// Errors surfaced by the server, answer synthesis and export paths.
#[derive(Debug, thiserror::Error)]
pub enum BlasterError {
    /// A search or crawl operation failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// The LLM provider request failed.
    #[error("llm error: {0}")]
    Llm(String),

    /// A CSV or JSON export failed.
    #[error("export error: {0}")]
    Export(String),

    /// Filesystem I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The request was malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenience type alias for blaster results.
pub type Result<T> = std::result::Result<T, BlasterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_error_converts() {
        let err: BlasterError = SearchError::Http("down".into()).into();
        assert_eq!(err.to_string(), "HTTP error: down");
    }

    #[test]
    fn invalid_request_display() {
        let err = BlasterError::InvalidRequest("query is required".into());
        assert_eq!(err.to_string(), "invalid request: query is required");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BlasterError>();
    }
}
