//! Sequential fetch of resolved targets into content records
//!
//! Targets are processed one at a time on the caller's browser and
//! appended in request order. Every target gets its own detached deadline
//! so one slow page cannot eat into the next one's budget; only explicit
//! cancellation or expiry of the batch deadline stops the batch.

use tracing::{debug, info, warn};

use crate::config::{FailurePolicy, FetchConfig};
use crate::deadline::Deadline;
use crate::driver::{BrowserDriver, PageDriver};
use crate::errors::{ScrapeError, ScrapeResult};
use crate::navigation_retry::{RetryPolicy, navigate_with_retry};
use crate::page_extractor::{ContentLimits, extract_content};
use crate::page_lifecycle::{NavigateOptions, StabilityWindow, create_page, wait_for_stability};
use crate::records::{ContentRecord, FetchTarget};
use crate::utils::string_utils::char_len;

/// Fetch and extract one target
///
/// The page is closed before this returns, whatever the outcome.
pub async fn fetch_content<B: BrowserDriver>(
    browser: &B,
    target: &FetchTarget,
    config: &FetchConfig,
    batch: &Deadline,
) -> ScrapeResult<ContentRecord> {
    let item = batch.detached(config.fetch_page_timeout());
    let guard = create_page(browser, config.page_timeout(), &item, &target.label).await?;
    let outcome = fetch_on_page(guard.page(), target, config, &item).await;
    guard.close().await;
    outcome
}

async fn fetch_on_page<P: PageDriver>(
    page: &P,
    target: &FetchTarget,
    config: &FetchConfig,
    item: &Deadline,
) -> ScrapeResult<ContentRecord> {
    let attempts = navigate_with_retry(
        page,
        &target.url,
        RetryPolicy::from_config(config),
        &NavigateOptions::for_fetch(config),
        item,
    )
    .await?;
    debug!("Loaded {} on attempt {attempts}", target.url);

    // Partially rendered content is still worth extracting
    let window = StabilityWindow::new(config.fetch_stable_quiet(), config.fetch_stable_window());
    tokio::select! {
        biased;
        () = item.cancelled() => {
            return Err(ScrapeError::Cancelled("page stabilization".to_string()));
        }
        () = tokio::time::sleep_until(item.expires_at()) => {
            warn!("{} did not stabilize before its deadline, extracting anyway", target.url);
        }
        stable = wait_for_stability(page, window) => {
            if !stable {
                debug!("{} kept mutating, extracting anyway", target.url);
            }
        }
    }

    item.until_cancelled(tokio::time::sleep(config.post_stability_delay()), "post-load pause")
        .await?;

    let extraction = item
        .until_cancelled(extract_content(page, ContentLimits::from_config(config)), "extraction")
        .await?;
    debug!(
        "Extracted {} chars from {} via {}",
        char_len(&extraction.content),
        target.url,
        extraction.strategy
    );

    Ok(ContentRecord::new(target, extraction.content))
}

/// Fetch every target in order, recovering per-target failures
///
/// Failed targets are omitted or replaced by an empty-content placeholder
/// according to the configured [`FailurePolicy`]. Once the batch deadline
/// is cancelled or expired no further target is started and the records
/// gathered so far are returned.
pub async fn fetch_all<B: BrowserDriver>(
    browser: &B,
    targets: &[FetchTarget],
    config: &FetchConfig,
    batch: &Deadline,
) -> Vec<ContentRecord> {
    let mut records = Vec::with_capacity(targets.len());

    for (index, target) in targets.iter().enumerate() {
        if let Err(e) = batch.check("batch fetch") {
            warn!(
                "Stopping batch after {index}/{} targets: {e}",
                targets.len()
            );
            break;
        }

        match fetch_content(browser, target, config, batch).await {
            Ok(record) => {
                info!(
                    "Fetched {} ({} chars)",
                    record.url,
                    char_len(&record.content)
                );
                records.push(record);
            }
            Err(e) if e.is_cancellation() && batch.is_cancelled() => {
                warn!("Batch cancelled while fetching {}: {e}", target.url);
                break;
            }
            Err(e) => {
                warn!("Skipping {}: {e}", target.url);
                if config.failure_policy() == FailurePolicy::Placeholder {
                    records.push(ContentRecord::placeholder(target));
                }
            }
        }
    }

    records
}
