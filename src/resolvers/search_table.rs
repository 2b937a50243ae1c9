//! Search-results page resolver
//!
//! Loads a site's search page, waits for the result table to render, and
//! turns the anchors it finds into fetch targets. Result markup changes
//! often, so anchors are located with a list of progressively looser
//! selectors and the first one matching anything wins.

use std::collections::HashSet;
use std::sync::LazyLock;

use tracing::{debug, info, warn};
use url::Url;

use super::SiteResolver;
use crate::config::FetchConfig;
use crate::deadline::Deadline;
use crate::driver::{BrowserDriver, PageDriver};
use crate::errors::{ScrapeError, ScrapeResult};
use crate::page_lifecycle::{NavigateOptions, create_page, navigate_and_verify};
use crate::records::FetchTarget;
use crate::utils::url_utils::{fill_keyword_template, resolve_href};

/// Anchor selectors for the xueqiu stock search table, strictest first
pub const XUEQIU_SELECTORS: [&str; 6] = [
    ".search__stock__bd .search__stock__ai__table tr td a",
    ".search__stock__bd.search__stock__ai__table tr td a",
    ".search__stock__ai__table tr td a",
    "table.search__stock__ai__table tr td a",
    "tr td a[href*='/S/']",
    "td a[href*='/S/']",
];

static XUEQIU_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://xueqiu.com").expect("XUEQIU_BASE: hardcoded URL is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTableResolver {
    search_template: String,
    base_url: Url,
    selectors: Vec<String>,
    label_suffix: String,
}

impl SearchTableResolver {
    pub fn new(
        search_template: impl Into<String>,
        base_url: &str,
        selectors: impl IntoIterator<Item = impl Into<String>>,
        label_suffix: impl Into<String>,
    ) -> ScrapeResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ScrapeError::Config(format!("invalid base URL '{base_url}': {e}")))?;
        let selectors: Vec<String> = selectors.into_iter().map(Into::into).collect();
        if selectors.is_empty() {
            return Err(ScrapeError::Config(
                "search table resolver needs at least one selector".to_string(),
            ));
        }
        Ok(Self {
            search_template: search_template.into(),
            base_url,
            selectors,
            label_suffix: label_suffix.into(),
        })
    }

    /// Xueqiu stock search
    #[must_use]
    pub fn xueqiu() -> Self {
        Self {
            search_template: "https://xueqiu.com/k?q={keyword}".to_string(),
            base_url: XUEQIU_BASE.clone(),
            selectors: XUEQIU_SELECTORS.iter().map(ToString::to_string).collect(),
            label_suffix: "-雪球股票".to_string(),
        }
    }

    #[must_use]
    pub fn search_url(&self, keyword: &str) -> String {
        fill_keyword_template(&self.search_template, keyword)
    }

    #[must_use]
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// First selector matching any element wins; `None` if none match
    async fn find_hrefs<P: PageDriver>(&self, page: &P) -> Option<(&str, Vec<Option<String>>)> {
        for selector in &self.selectors {
            match page.attribute_values(selector, "href").await {
                Ok(hrefs) if !hrefs.is_empty() => {
                    debug!("Selector '{selector}' matched {} elements", hrefs.len());
                    return Some((selector.as_str(), hrefs));
                }
                Ok(_) => debug!("Selector '{selector}' matched nothing"),
                Err(e) => debug!("Selector '{selector}' failed: {e:#}"),
            }
        }
        None
    }

    /// Absolute targets in document order
    ///
    /// Anchors that resolve to an already-seen URL are dropped, so a page
    /// linked twice in the table is fetched once and the target count can
    /// fall below the anchor count.
    fn targets_from_hrefs(
        &self,
        hrefs: Vec<Option<String>>,
        keyword: &str,
        cap: Option<usize>,
    ) -> Vec<FetchTarget> {
        let label = format!("{keyword}{}", self.label_suffix);
        let mut seen = HashSet::new();
        let mut targets: Vec<FetchTarget> = hrefs
            .into_iter()
            .flatten()
            .filter_map(|href| resolve_href(&self.base_url, &href))
            .filter(|url| seen.insert(url.clone()))
            .map(|url| FetchTarget::new(url, label.clone()))
            .collect();

        if let Some(cap) = cap
            && targets.len() > cap
        {
            info!("Capping {} resolved targets to {cap}", targets.len());
            targets.truncate(cap);
        }
        targets
    }

    async fn scrape_targets<P: PageDriver>(
        &self,
        page: &P,
        keyword: &str,
        config: &FetchConfig,
        deadline: &Deadline,
    ) -> ScrapeResult<Vec<FetchTarget>> {
        let search_url = self.search_url(keyword);
        info!("Loading search page {search_url}");

        deadline
            .run(
                navigate_and_verify(page, &search_url, &NavigateOptions::for_search(config)),
                "search page load",
            )
            .await?
            .map_err(|e| ScrapeError::Resolve {
                keyword: keyword.to_string(),
                message: e.to_string(),
            })?;

        let Some((selector, hrefs)) = deadline.run(self.find_hrefs(page), "link discovery").await?
        else {
            warn!("No result links found for '{keyword}'; selectors may need adjusting");
            return Ok(Vec::new());
        };

        let targets = self.targets_from_hrefs(hrefs, keyword, config.max_targets());
        info!(
            "Resolved {} targets for '{keyword}' via '{selector}'",
            targets.len()
        );
        Ok(targets)
    }
}

impl SiteResolver for SearchTableResolver {
    fn name(&self) -> &str {
        "search-table"
    }

    async fn resolve<B: BrowserDriver>(
        &self,
        browser: &B,
        keyword: &str,
        config: &FetchConfig,
        deadline: &Deadline,
    ) -> ScrapeResult<Vec<FetchTarget>> {
        let guard = create_page(browser, config.page_timeout(), deadline, "search page").await?;
        let outcome = self
            .scrape_targets(guard.page(), keyword, config, deadline)
            .await;
        guard.close().await;
        outcome
    }
}
