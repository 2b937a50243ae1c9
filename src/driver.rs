//! Browser driver abstraction
//!
//! The pipeline only needs a handful of browser operations. They are
//! expressed as two traits so the lifecycle, retry, extraction and
//! resolution logic can be exercised against scripted drivers, while
//! production code runs on chromiumoxide.

use std::future::Future;

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use serde_json::Value;

/// One navigable tab
///
/// Implementations must be cheap to clone; clones refer to the same tab.
pub trait PageDriver: Clone + Send + Sync + 'static {
    /// Issue a navigation to `url`
    fn navigate(&self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// Wait for the load event of the current navigation
    fn wait_for_load(&self) -> impl Future<Output = Result<()>> + Send;

    /// Current document title, `None` when the page reports none
    fn page_title(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Evaluate `script` and return its result in string form
    ///
    /// String results are returned as-is, other JSON values serialized,
    /// `null`/`undefined` as `None`.
    fn evaluate_to_string(&self, script: &str)
    -> impl Future<Output = Result<Option<String>>> + Send;

    /// Rendered text of the first element matching `selector`
    fn first_element_text(&self, selector: &str)
    -> impl Future<Output = Result<Option<String>>> + Send;

    /// `name` attribute of every element matching `selector`, in document
    /// order; elements without the attribute yield `None`
    fn attribute_values(
        &self,
        selector: &str,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Option<String>>>> + Send;

    /// Close the tab
    fn close_page(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Something that can open tabs
pub trait BrowserDriver: Send + Sync {
    type Page: PageDriver;

    /// Open a blank tab; `Ok(None)` means the driver returned no page
    fn new_page(&self) -> impl Future<Output = Result<Option<Self::Page>>> + Send;
}

impl PageDriver for Page {
    async fn navigate(&self, url: &str) -> Result<()> {
        Page::goto(self, url)
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;
        Ok(())
    }

    async fn wait_for_load(&self) -> Result<()> {
        Page::wait_for_navigation(self)
            .await
            .context("Failed to wait for page load")?;
        Ok(())
    }

    async fn page_title(&self) -> Result<Option<String>> {
        Page::get_title(self)
            .await
            .context("Failed to read page title")
    }

    async fn evaluate_to_string(&self, script: &str) -> Result<Option<String>> {
        let result = Page::evaluate(self, script)
            .await
            .context("Failed to evaluate script")?;

        Ok(match result.into_value::<Value>() {
            Ok(Value::String(text)) => Some(text),
            Ok(Value::Null) | Err(_) => None,
            Ok(other) => Some(other.to_string()),
        })
    }

    async fn first_element_text(&self, selector: &str) -> Result<Option<String>> {
        let elements = Page::find_elements(self, selector)
            .await
            .with_context(|| format!("Failed to query '{selector}'"))?;

        match elements.first() {
            Some(element) => element
                .inner_text()
                .await
                .with_context(|| format!("Failed to read text of '{selector}'")),
            None => Ok(None),
        }
    }

    async fn attribute_values(&self, selector: &str, name: &str) -> Result<Vec<Option<String>>> {
        let elements = Page::find_elements(self, selector)
            .await
            .with_context(|| format!("Failed to query '{selector}'"))?;

        let mut values = Vec::with_capacity(elements.len());
        for element in &elements {
            values.push(element.attribute(name).await.ok().flatten());
        }
        Ok(values)
    }

    async fn close_page(&self) -> Result<()> {
        Page::close(self.clone())
            .await
            .context("Failed to close page")
    }
}
