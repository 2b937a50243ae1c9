//! Browser session lifecycle
//!
//! A `BrowserSession` owns one Chrome process for exactly one top-level
//! operation. It is never shared: concurrent operations each open their
//! own. `close()` must be awaited on every exit path; `Drop` only aborts
//! the handler and removes the profile directory as a fallback.

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::Page;
use log::{debug, info, warn};
use std::path::PathBuf;
use tokio::task::JoinHandle;

use crate::browser_setup::launch_browser;
use crate::config::FetchConfig;
use crate::deadline::Deadline;
use crate::driver::BrowserDriver;
use crate::errors::{ScrapeError, ScrapeResult};
use crate::page_extractor::js_scripts::STEALTH_SCRIPT;

pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    deadline: Deadline,
    closed: bool,
}

impl BrowserSession {
    /// Launch a browser whose lifetime is bounded by `deadline`
    ///
    /// The session deadline is the caller's deadline capped at the
    /// configured session timeout; every later step inherits it.
    pub async fn open(config: &FetchConfig, deadline: &Deadline) -> ScrapeResult<Self> {
        let session_deadline = deadline.child(config.session_timeout());

        let (browser, handler, user_data_dir) = session_deadline
            .run(launch_browser(config), "browser launch")
            .await?
            .map_err(|e| ScrapeError::Launch(format!("{e:#}")))?;

        info!(target: "stocknews::session", "Browser session opened");

        Ok(Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
            deadline: session_deadline,
            closed: false,
        })
    }

    /// Session-wide deadline all operations on this session inherit
    #[must_use]
    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    /// Close the browser, wait for the process, and remove the profile
    ///
    /// Safe to call more than once; failures are logged, never returned.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        debug!(target: "stocknews::cleanup", "Closing browser");
        if let Err(e) = self.browser.close().await {
            warn!(target: "stocknews::cleanup", "Failed to close browser: {e}");
        }

        // Wait for process exit so the profile directory is no longer locked
        if let Err(e) = self.browser.wait().await {
            warn!(target: "stocknews::cleanup", "Failed to wait for browser exit: {e}");
        }

        self.handler.abort();
        self.cleanup_temp_dir();
        info!(target: "stocknews::session", "Browser session closed");
    }

    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!(target: "stocknews::cleanup", "Removing profile directory {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    target: "stocknews::cleanup",
                    "Failed to remove profile directory {}: {e}",
                    path.display()
                );
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                target: "stocknews::cleanup",
                "BrowserSession dropped without close(); aborting handler"
            );
        }
        self.handler.abort();
        self.cleanup_temp_dir();
    }
}

impl BrowserDriver for BrowserSession {
    type Page = Page;

    async fn new_page(&self) -> anyhow::Result<Option<Page>> {
        let page = self.browser.new_page("about:blank").await?;

        // Stealth script must be registered before the first navigation
        let stealth = AddScriptToEvaluateOnNewDocumentParams {
            source: STEALTH_SCRIPT.to_string(),
            include_command_line_api: None,
            world_name: None,
            run_immediately: None,
        };
        if let Err(e) = page.execute(stealth).await {
            warn!(target: "stocknews::page", "Failed to register stealth script: {e}");
        }

        Ok(Some(page))
    }
}
