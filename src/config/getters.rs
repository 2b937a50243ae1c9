//! Getter methods for `FetchConfig`

use std::path::Path;
use std::time::Duration;

use super::types::{FailurePolicy, FetchConfig};

impl FetchConfig {
    #[must_use]
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Timeout for page creation and search-page navigation
    #[must_use]
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    /// Per-operation budget on article pages: twice `page_timeout`
    #[must_use]
    pub fn fetch_page_timeout(&self) -> Duration {
        self.page_timeout() * 2
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn attempt_delay(&self) -> Duration {
        Duration::from_secs(self.attempt_delay_secs)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn post_stability_delay(&self) -> Duration {
        Duration::from_millis(self.post_stability_delay_ms)
    }

    #[must_use]
    pub fn search_stable_quiet(&self) -> Duration {
        Duration::from_secs(self.search_stable_quiet_secs)
    }

    #[must_use]
    pub fn search_stable_window(&self) -> Duration {
        Duration::from_secs(self.search_stable_window_secs)
    }

    #[must_use]
    pub fn fetch_stable_quiet(&self) -> Duration {
        Duration::from_secs(self.fetch_stable_quiet_secs)
    }

    #[must_use]
    pub fn fetch_stable_window(&self) -> Duration {
        Duration::from_secs(self.fetch_stable_window_secs)
    }

    #[must_use]
    pub fn max_content_chars(&self) -> usize {
        self.max_content_chars
    }

    #[must_use]
    pub fn min_content_chars(&self) -> usize {
        self.min_content_chars
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&Path> {
        self.chrome_executable.as_deref()
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    #[must_use]
    pub fn max_targets(&self) -> Option<usize> {
        self.max_targets
    }
}
