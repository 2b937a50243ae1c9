//! Fluent builder for `FetchConfig`
//!
//! All fields have defaults, so the builder validates on `build()` instead
//! of tracking required fields in the type.

use std::path::PathBuf;
use std::time::Duration;

use super::types::{FailurePolicy, FetchConfig};
use crate::errors::{ScrapeError, ScrapeResult};

#[derive(Debug, Clone, Default)]
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfig {
    /// Create a builder for configuring a `FetchConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }
}

impl FetchConfigBuilder {
    #[must_use]
    pub fn session_timeout(mut self, timeout: Duration) -> Self {
        self.config.session_timeout_secs = timeout.as_secs();
        self
    }

    #[must_use]
    pub fn page_timeout(mut self, timeout: Duration) -> Self {
        self.config.page_timeout_secs = timeout.as_secs();
        self
    }

    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn attempt_delay(mut self, delay: Duration) -> Self {
        self.config.attempt_delay_secs = delay.as_secs();
        self
    }

    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn post_stability_delay(mut self, delay: Duration) -> Self {
        self.config.post_stability_delay_ms =
            u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn search_stability(mut self, quiet: Duration, window: Duration) -> Self {
        self.config.search_stable_quiet_secs = quiet.as_secs();
        self.config.search_stable_window_secs = window.as_secs();
        self
    }

    #[must_use]
    pub fn fetch_stability(mut self, quiet: Duration, window: Duration) -> Self {
        self.config.fetch_stable_quiet_secs = quiet.as_secs();
        self.config.fetch_stable_window_secs = window.as_secs();
        self
    }

    #[must_use]
    pub fn content_limits(mut self, min_chars: usize, max_chars: usize) -> Self {
        self.config.min_content_chars = min_chars;
        self.config.max_content_chars = max_chars;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: Option<PathBuf>) -> Self {
        self.config.chrome_executable = path;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn max_targets(mut self, max_targets: Option<usize>) -> Self {
        self.config.max_targets = max_targets;
        self
    }

    pub fn build(self) -> ScrapeResult<FetchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl FetchConfig {
    /// Check invariants that the pipeline relies on
    pub fn validate(&self) -> ScrapeResult<()> {
        if self.max_attempts == 0 {
            return Err(ScrapeError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.session_timeout_secs == 0 || self.page_timeout_secs == 0 {
            return Err(ScrapeError::Config(
                "session and page timeouts must be non-zero".to_string(),
            ));
        }
        if self.min_content_chars >= self.max_content_chars {
            return Err(ScrapeError::Config(format!(
                "min_content_chars ({}) must be below max_content_chars ({})",
                self.min_content_chars, self.max_content_chars
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ScrapeError::Config("user_agent cannot be empty".to_string()));
        }
        if self.max_targets == Some(0) {
            return Err(ScrapeError::Config(
                "max_targets must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}
