//! Error types for the extraction pipeline
//!
//! Operation-fatal errors (launch failure, top-level cancellation) abort a
//! whole search. Everything scoped to a single fetch target is recovered by
//! the aggregator and only logged.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Error types for browser sessions, page fetches and resolution
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Browser process or control connection could not be established
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// A single page could not be created (includes captured driver panics)
    #[error("Failed to create page: {0}")]
    PageCreation(String),

    /// Transport-level navigation failure for one attempt
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// Navigation completed but the page never produced a title
    #[error("Page at {url} did not finish loading: {message}")]
    LoadVerification { url: String, message: String },

    /// Terminal per-target failure once the retry budget is spent
    #[error("Fetch of {url} failed after {attempts} attempt(s): {last_cause}")]
    Fetch {
        url: String,
        attempts: u32,
        last_cause: String,
    },

    /// Explicit cancellation from the caller
    #[error("Operation cancelled during {0}")]
    Cancelled(String),

    /// Deadline elapsed before the step completed
    #[error("{what} exceeded its deadline after {elapsed:?}")]
    DeadlineExceeded { what: String, elapsed: Duration },

    /// Keyword rejected before any browser work
    #[error("Invalid keyword: {0}")]
    InvalidKeyword(String),

    /// Search page could not be turned into fetch targets
    #[error("Failed to resolve targets for '{keyword}': {message}")]
    Resolve { keyword: String, message: String },

    /// Configuration rejected by the builder
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The injected analysis backend failed
    #[error("Analysis failed: {0}")]
    Analysis(String),
}

impl ScrapeError {
    /// Whether the navigation retry loop may try again after this error
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Navigation { .. } | ScrapeError::LoadVerification { .. }
        )
    }

    /// Whether this error ends the whole operation rather than one target
    #[must_use]
    pub fn is_operation_fatal(&self) -> bool {
        matches!(
            self,
            ScrapeError::Launch(_)
                | ScrapeError::Cancelled(_)
                | ScrapeError::DeadlineExceeded { .. }
                | ScrapeError::InvalidKeyword(_)
                | ScrapeError::Resolve { .. }
                | ScrapeError::Config(_)
        )
    }

    /// Whether this error came from the deadline/cancellation machinery
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            ScrapeError::Cancelled(_) | ScrapeError::DeadlineExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_navigation_failures_are_retryable() {
        let nav = ScrapeError::Navigation {
            url: "https://example.com".into(),
            message: "net::ERR_CONNECTION_RESET".into(),
        };
        let load = ScrapeError::LoadVerification {
            url: "https://example.com".into(),
            message: "empty title".into(),
        };
        assert!(nav.is_retryable());
        assert!(load.is_retryable());
        assert!(!ScrapeError::PageCreation("boom".into()).is_retryable());
        assert!(!ScrapeError::Cancelled("fetch".into()).is_retryable());
    }

    #[test]
    fn test_fetch_error_is_not_operation_fatal() {
        let err = ScrapeError::Fetch {
            url: "https://example.com/a".into(),
            attempts: 2,
            last_cause: "empty title".into(),
        };
        assert!(!err.is_operation_fatal());
        assert!(ScrapeError::Launch("no chrome".into()).is_operation_fatal());
        assert_eq!(
            err.to_string(),
            "Fetch of https://example.com/a failed after 2 attempt(s): empty title"
        );
    }
}
