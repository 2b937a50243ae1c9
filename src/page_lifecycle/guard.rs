//! RAII guard that closes a page exactly once

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::driver::PageDriver;

/// Owns one page for the duration of a single unit of work
///
/// Call [`PageGuard::close`] on every exit path. If the guard is dropped
/// without it (early return, panic unwinding through the owner), the
/// close is spawned onto the current runtime instead.
pub struct PageGuard<P: PageDriver> {
    page: P,
    label: String,
    closed: AtomicBool,
}

impl<P: PageDriver> PageGuard<P> {
    pub fn new(page: P, label: impl Into<String>) -> Self {
        Self {
            page,
            label: label.into(),
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close the page; later calls are no-ops
    ///
    /// Close failures are logged and swallowed so they never mask the
    /// outcome of the work done on the page.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        match self.page.close_page().await {
            Ok(()) => debug!(target: "stocknews::page", "Closed page for {}", self.label),
            Err(e) => warn!(
                target: "stocknews::cleanup",
                "Failed to close page for {}: {e:#}",
                self.label
            ),
        }
    }
}

impl<P: PageDriver> Drop for PageGuard<P> {
    fn drop(&mut self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let page = self.page.clone();
        let label = std::mem::take(&mut self.label);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = page.close_page().await {
                        warn!(
                            target: "stocknews::cleanup",
                            "Failed to close dropped page for {label}: {e:#}"
                        );
                    }
                });
            }
            Err(_) => warn!(
                target: "stocknews::cleanup",
                "Page for {label} dropped outside a runtime; it stays open until the browser exits"
            ),
        }
    }
}
