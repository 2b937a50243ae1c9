//! Core configuration types for the extraction pipeline
//!
//! Durations are stored as integer seconds/milliseconds so the struct
//! round-trips through any serde format; `getters.rs` exposes them as
//! `Duration`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::constants::{
    CHROME_USER_AGENT, DEFAULT_ATTEMPT_DELAY_SECS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_PAGE_TIMEOUT_SECS, DEFAULT_POST_STABILITY_DELAY_MS, DEFAULT_SESSION_TIMEOUT_SECS,
    DEFAULT_SETTLE_DELAY_MS, FETCH_STABLE_QUIET_SECS, FETCH_STABLE_WINDOW_SECS,
    MAX_CONTENT_CHARS, MIN_CONTENT_CHARS, SEARCH_STABLE_QUIET_SECS, SEARCH_STABLE_WINDOW_SECS,
};

/// What the aggregator emits for a target that failed terminally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Failed targets contribute no record
    #[default]
    Omit,
    /// Failed targets contribute an empty-content record at their position
    Placeholder,
}

/// Main configuration struct for search and fetch operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Session-wide deadline for one top-level operation
    ///
    /// Default: 1200 seconds (20 minutes)
    pub(crate) session_timeout_secs: u64,

    /// Timeout for page creation and for the search-page navigation
    ///
    /// Article fetches give page operations twice this budget.
    ///
    /// Default: 60 seconds
    pub(crate) page_timeout_secs: u64,

    /// Navigation attempts per target, first attempt included
    ///
    /// Default: 2
    pub(crate) max_attempts: u32,

    /// Fixed delay before each retry
    ///
    /// Default: 2 seconds
    pub(crate) attempt_delay_secs: u64,

    /// Pause after the load event before the title check
    pub(crate) settle_delay_ms: u64,

    /// Pause after the stability wait before extraction or selection
    pub(crate) post_stability_delay_ms: u64,

    pub(crate) search_stable_quiet_secs: u64,
    pub(crate) search_stable_window_secs: u64,
    pub(crate) fetch_stable_quiet_secs: u64,
    pub(crate) fetch_stable_window_secs: u64,

    /// Extracted content cap in characters
    pub(crate) max_content_chars: usize,

    /// Structured strategies must produce more than this many characters
    pub(crate) min_content_chars: usize,

    pub(crate) headless: bool,

    /// Explicit Chrome/Chromium binary; discovery runs when unset
    pub(crate) chrome_executable: Option<PathBuf>,

    pub(crate) user_agent: String,

    pub(crate) failure_policy: FailurePolicy,

    /// Upper bound on targets fetched from one search page
    pub(crate) max_targets: Option<usize>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            session_timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
            page_timeout_secs: DEFAULT_PAGE_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_delay_secs: DEFAULT_ATTEMPT_DELAY_SECS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            post_stability_delay_ms: DEFAULT_POST_STABILITY_DELAY_MS,
            search_stable_quiet_secs: SEARCH_STABLE_QUIET_SECS,
            search_stable_window_secs: SEARCH_STABLE_WINDOW_SECS,
            fetch_stable_quiet_secs: FETCH_STABLE_QUIET_SECS,
            fetch_stable_window_secs: FETCH_STABLE_WINDOW_SECS,
            max_content_chars: MAX_CONTENT_CHARS,
            min_content_chars: MIN_CONTENT_CHARS,
            headless: true,
            chrome_executable: None,
            user_agent: CHROME_USER_AGENT.to_string(),
            failure_policy: FailurePolicy::Omit,
            max_targets: None,
        }
    }
}
