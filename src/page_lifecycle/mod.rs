//! Page lifecycle: creation, navigation with load verification, close
//!
//! Page creation is the one place a driver has been seen to panic, so it
//! runs behind a panic boundary and every failure mode comes back as
//! `ScrapeError::PageCreation`. A created page is always wrapped in a
//! [`PageGuard`] so it is closed exactly once.

pub mod guard;
pub mod page_timeout;
pub mod stability;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::deadline::Deadline;
use crate::driver::{BrowserDriver, PageDriver};
use crate::errors::{ScrapeError, ScrapeResult};

pub use guard::PageGuard;
pub use page_timeout::with_page_timeout;
pub use stability::{StabilityWindow, wait_for_stability};

/// Open a page, converting driver errors, timeouts, empty results and
/// panics into `ScrapeError::PageCreation`
///
/// On timeout the pending `new_page` call is dropped. A tab the browser
/// had already opened by then has no guard and stays open until the
/// session's browser shuts down.
pub async fn create_page<B: BrowserDriver>(
    browser: &B,
    timeout: Duration,
    deadline: &Deadline,
    label: &str,
) -> ScrapeResult<PageGuard<B::Page>> {
    let creation = AssertUnwindSafe(browser.new_page()).catch_unwind();
    let outcome = deadline
        .run(tokio::time::timeout(timeout, creation), "page creation")
        .await?;

    match outcome {
        Ok(Ok(Ok(Some(page)))) => {
            debug!("Created page for {label}");
            Ok(PageGuard::new(page, label))
        }
        Ok(Ok(Ok(None))) => Err(ScrapeError::PageCreation(
            "driver returned no page".to_string(),
        )),
        Ok(Ok(Err(e))) => Err(ScrapeError::PageCreation(format!("{e:#}"))),
        Ok(Err(panic)) => {
            let message = panic_message(panic.as_ref());
            warn!("Page creation panicked for {label}: {message}");
            Err(ScrapeError::PageCreation(format!(
                "driver panicked: {message}"
            )))
        }
        Err(_) => Err(ScrapeError::PageCreation(format!(
            "timed out after {} seconds",
            timeout.as_secs()
        ))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Timing for one navigate-and-verify attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Bound on each individual driver call
    pub op_timeout: Duration,
    /// Pause after the load event before anything reads the page
    pub settle_delay: Duration,
    /// Optional DOM stability wait, followed by `post_stability_delay`
    pub stability: Option<StabilityWindow>,
    pub post_stability_delay: Duration,
}

impl NavigateOptions {
    /// Options for fetching target pages: no stability wait per attempt,
    /// and the extended operation timeout
    #[must_use]
    pub fn for_fetch(config: &FetchConfig) -> Self {
        Self {
            op_timeout: config.fetch_page_timeout(),
            settle_delay: config.settle_delay(),
            stability: None,
            post_stability_delay: Duration::ZERO,
        }
    }

    /// Options for search result pages, which render their result list
    /// after load and need the stability wait
    #[must_use]
    pub fn for_search(config: &FetchConfig) -> Self {
        Self {
            op_timeout: config.page_timeout(),
            settle_delay: config.settle_delay(),
            stability: Some(StabilityWindow::new(
                config.search_stable_quiet(),
                config.search_stable_window(),
            )),
            post_stability_delay: config.post_stability_delay(),
        }
    }
}

/// Navigate `page` to `url` and verify that it actually loaded
///
/// Steps: issue the navigation, wait for the load event, settle, optionally
/// wait for DOM stability, then require a non-empty title. Transport
/// failures map to `Navigation`, a missing title to `LoadVerification`.
pub async fn navigate_and_verify<P: PageDriver>(
    page: &P,
    url: &str,
    options: &NavigateOptions,
) -> ScrapeResult<()> {
    with_page_timeout(page.navigate(url), options.op_timeout, "Navigation")
        .await
        .map_err(|e| ScrapeError::Navigation {
            url: url.to_string(),
            message: format!("{e:#}"),
        })?;

    // A missed load event is not fatal; the title check decides
    if let Err(e) = with_page_timeout(page.wait_for_load(), options.op_timeout, "Page load").await {
        debug!("Load wait for {url} did not complete: {e:#}");
    }

    tokio::time::sleep(options.settle_delay).await;

    if let Some(window) = options.stability {
        wait_for_stability(page, window).await;
        tokio::time::sleep(options.post_stability_delay).await;
    }

    verify_loaded(page, url, options.op_timeout).await
}

async fn verify_loaded<P: PageDriver>(page: &P, url: &str, timeout: Duration) -> ScrapeResult<()> {
    let title = with_page_timeout(page.page_title(), timeout, "Title read")
        .await
        .map_err(|e| ScrapeError::LoadVerification {
            url: url.to_string(),
            message: format!("failed to read page info: {e:#}"),
        })?;

    match title {
        Some(title) if !title.trim().is_empty() => {
            debug!("Loaded {url}: {title}");
            Ok(())
        }
        _ => Err(ScrapeError::LoadVerification {
            url: url.to_string(),
            message: "page has an empty title".to_string(),
        }),
    }
}
