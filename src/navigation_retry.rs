//! Bounded retry around navigate-and-verify
//!
//! Only navigation and load-verification failures are retried. Each retry
//! waits a fixed delay first, and the deadline is checked before every
//! attempt so an expired or cancelled operation never starts new work.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::FetchConfig;
use crate::deadline::Deadline;
use crate::driver::PageDriver;
use crate::errors::{ScrapeError, ScrapeResult};
use crate::page_lifecycle::{NavigateOptions, navigate_and_verify};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts(),
            attempt_delay: config.attempt_delay(),
        }
    }
}

/// Navigate with retries; returns the attempt number that succeeded
///
/// Exhausting the budget yields `ScrapeError::Fetch` carrying the attempt
/// count and the last cause. Deadline errors are returned as-is.
pub async fn navigate_with_retry<P: PageDriver>(
    page: &P,
    url: &str,
    policy: RetryPolicy,
    options: &NavigateOptions,
    deadline: &Deadline,
) -> ScrapeResult<u32> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error: Option<ScrapeError> = None;

    for attempt in 1..=max_attempts {
        deadline.check("navigation")?;

        if attempt > 1 {
            info!("Retrying {url} (attempt {attempt}/{max_attempts})");
            deadline
                .until_cancelled(tokio::time::sleep(policy.attempt_delay), "retry delay")
                .await?;
            deadline.check("navigation")?;
        }

        let outcome = deadline
            .until_cancelled(navigate_and_verify(page, url, options), "navigation")
            .await?;

        match outcome {
            Ok(()) => return Ok(attempt),
            Err(e) if e.is_retryable() => {
                warn!("Attempt {attempt}/{max_attempts} for {url} failed: {e}");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(ScrapeError::Fetch {
        url: url.to_string(),
        attempts: max_attempts,
        last_cause: last_error.map(|e| e.to_string()).unwrap_or_default(),
    })
}
