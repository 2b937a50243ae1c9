//! Shared configuration constants for the stock news pipeline
//!
//! Default values used by `FetchConfig` and the extraction stages, kept in
//! one place to avoid magic numbers.

/// Session-wide deadline for one search operation: 20 minutes
///
/// Long enough for a search-table resolution followed by a sequential
/// fetch of every resolved page.
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 20 * 60;

/// Page creation / navigation timeout: 60 seconds
///
/// The fetch phase doubles this for page operations on article pages.
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 60;

/// Navigation attempts per target (first attempt included)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Fixed delay before every attempt after the first
pub const DEFAULT_ATTEMPT_DELAY_SECS: u64 = 2;

/// Pause after the load event before reading page metadata
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// Pause after the stability wait before extraction
pub const DEFAULT_POST_STABILITY_DELAY_MS: u64 = 2000;

/// Stability wait on search pages: 2s quiet inside a 20s window
pub const SEARCH_STABLE_QUIET_SECS: u64 = 2;
pub const SEARCH_STABLE_WINDOW_SECS: u64 = 20;

/// Stability wait on fetched pages: 3s quiet inside a 30s window
pub const FETCH_STABLE_QUIET_SECS: u64 = 3;
pub const FETCH_STABLE_WINDOW_SECS: u64 = 30;

/// Polling interval for the DOM mutation counter
pub const STABILITY_POLL_INTERVAL_MS: u64 = 200;

/// Hard cap on extracted content, in characters
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Minimum length a structured strategy must exceed to be accepted
pub const MIN_CONTENT_CHARS: usize = 100;

/// Appended when content is truncated at `MAX_CONTENT_CHARS`
pub const TRUNCATION_MARKER: &str = "...";

/// Longest keyword accepted from the invocation layer
pub const MAX_KEYWORD_CHARS: usize = 100;

/// Records forwarded to the analysis backend
pub const MAX_ANALYSIS_RECORDS: usize = 20;

/// Chrome user agent string for stealth mode
///
/// Desktop macOS Chrome; matches the `navigator.platform` reported by the
/// stealth script.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
