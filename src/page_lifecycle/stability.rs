//! DOM stability detection
//!
//! A page counts as stable once its mutation counter has not moved for the
//! quiet interval. The wait gives up after the window and reports `false`;
//! callers treat that as "good enough" and carry on.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use crate::driver::PageDriver;
use crate::page_extractor::js_scripts::MUTATION_PROBE_SCRIPT;
use crate::utils::constants::STABILITY_POLL_INTERVAL_MS;

/// Quiet interval and overall cap for one stability wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityWindow {
    pub quiet: Duration,
    pub max_wait: Duration,
}

impl StabilityWindow {
    #[must_use]
    pub fn new(quiet: Duration, max_wait: Duration) -> Self {
        Self { quiet, max_wait }
    }
}

/// Wait until the DOM stops mutating; returns whether it did within the
/// window. Never errors: probe failures just restart the quiet interval.
pub async fn wait_for_stability<P: PageDriver>(page: &P, window: StabilityWindow) -> bool {
    let start = Instant::now();
    match tokio::time::timeout(window.max_wait, poll_until_quiet(page, window.quiet)).await {
        Ok(()) => {
            debug!(
                "Page stable after {:.2}s",
                start.elapsed().as_secs_f64()
            );
            true
        }
        Err(_) => {
            debug!(
                "Page still mutating after {}s, proceeding anyway",
                window.max_wait.as_secs()
            );
            false
        }
    }
}

async fn poll_until_quiet<P: PageDriver>(page: &P, quiet: Duration) {
    let poll_interval = Duration::from_millis(STABILITY_POLL_INTERVAL_MS);
    let mut last_count: Option<u64> = None;
    let mut quiet_since = Instant::now();

    loop {
        let count = match page.evaluate_to_string(MUTATION_PROBE_SCRIPT).await {
            Ok(Some(raw)) => raw.trim().parse::<u64>().ok(),
            Ok(None) => None,
            Err(e) => {
                trace!("Mutation probe failed: {e:#}");
                None
            }
        };

        match count {
            Some(count) if last_count == Some(count) => {
                if quiet_since.elapsed() >= quiet {
                    return;
                }
            }
            Some(count) => {
                last_count = Some(count);
                quiet_since = Instant::now();
            }
            None => {
                last_count = None;
                quiet_since = Instant::now();
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}
