//! Scripted browser drivers shared by the integration tests
//!
//! `MockBrowser` hands out `MockPage`s that answer navigation, title,
//! script and selector queries from per-URL `SiteScript`s, and record
//! everything they were asked so tests can assert on call order.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use kodegen_tools_stocknews::page_extractor::js_scripts::{MUTATION_PROBE_SCRIPT, TEXT_WALK_SCRIPT};
use kodegen_tools_stocknews::{BrowserDriver, FetchConfig, PageDriver};
use tokio::time::Instant;

/// How a page behaves once navigated to a given URL
#[derive(Debug, Clone, Default)]
pub struct SiteScript {
    /// Title once loaded; `None` means the page never gets one
    pub title: Option<String>,
    /// Leading navigations that fail at the transport level
    pub failed_navigations: usize,
    /// Leading navigations (after the failed ones) that load untitled
    pub untitled_navigations: usize,
    /// Raw result of the text-walk script
    pub text_walk: Option<String>,
    /// Text of the first element per selector
    pub selector_text: HashMap<String, String>,
    /// Rendered body text
    pub body: Option<String>,
    /// `href` values per anchor selector
    pub hrefs: HashMap<String, Vec<Option<String>>>,
    /// Time each navigation takes
    pub navigation_delay: Duration,
    /// The DOM never stops mutating
    pub mutating: bool,
}

impl SiteScript {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn untitled() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            title: Some("never seen".to_string()),
            failed_navigations: usize::MAX,
            ..Self::default()
        }
    }

    pub fn with_text_walk(mut self, text: impl Into<String>) -> Self {
        self.text_walk = Some(text.into());
        self
    }

    pub fn with_selector_text(mut self, selector: &str, text: impl Into<String>) -> Self {
        self.selector_text.insert(selector.to_string(), text.into());
        self
    }

    pub fn with_body(mut self, text: impl Into<String>) -> Self {
        self.body = Some(text.into());
        self
    }

    pub fn with_hrefs(mut self, selector: &str, hrefs: &[&str]) -> Self {
        self.hrefs.insert(
            selector.to_string(),
            hrefs.iter().map(|h| Some((*h).to_string())).collect(),
        );
        self
    }

    pub fn failing_first(mut self, navigations: usize) -> Self {
        self.failed_navigations = navigations;
        self
    }

    pub fn untitled_first(mut self, navigations: usize) -> Self {
        self.untitled_navigations = navigations;
        self
    }

    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    pub fn mutating(mut self) -> Self {
        self.mutating = true;
        self
    }
}

/// Page lifecycle and navigation, in the order the driver saw them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Opened,
    Closed,
    Navigated(String),
}

/// What the next `new_page` call does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creation {
    Page,
    Error,
    Empty,
    Panic,
    /// The tab opens browser-side but the call never returns
    Stalled,
}

#[derive(Default)]
pub struct MockState {
    sites: Mutex<HashMap<String, SiteScript>>,
    navigation_counts: Mutex<HashMap<String, usize>>,
    creation_plan: Mutex<VecDeque<Creation>>,
    navigations: Mutex<Vec<(String, Instant)>>,
    selector_queries: Mutex<Vec<String>>,
    evaluations: Mutex<Vec<String>>,
    mutation_counter: AtomicU64,
    events: Mutex<Vec<PageEvent>>,
    open_pages: AtomicUsize,
    max_open_pages: AtomicUsize,
    pub pages_created: AtomicUsize,
    pub pages_closed: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct MockBrowser {
    pub state: Arc<MockState>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site(self, url: &str, script: SiteScript) -> Self {
        self.state
            .sites
            .lock()
            .unwrap()
            .insert(url.to_string(), script);
        self
    }

    /// Queue creation outcomes; once exhausted every call yields a page
    pub fn with_creations(self, plan: &[Creation]) -> Self {
        self.state
            .creation_plan
            .lock()
            .unwrap()
            .extend(plan.iter().copied());
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state
            .navigations
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn navigation_times(&self, url: &str) -> Vec<Instant> {
        self.state
            .navigations
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == url)
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn selector_queries(&self) -> Vec<String> {
        self.state.selector_queries.lock().unwrap().clone()
    }

    pub fn evaluated(&self, script: &str) -> usize {
        self.state
            .evaluations
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.as_str() == script)
            .count()
    }

    pub fn pages_created(&self) -> usize {
        self.state.pages_created.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.state.pages_closed.load(Ordering::SeqCst)
    }

    /// Most pages ever open at the same time
    pub fn max_open_pages(&self) -> usize {
        self.state.max_open_pages.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<PageEvent> {
        self.state.events.lock().unwrap().clone()
    }

    /// A fresh page already navigated to `url`
    pub async fn page_at(&self, url: &str) -> MockPage {
        let page = self.make_page();
        page.navigate(url).await.unwrap();
        page
    }

    /// A fresh page that has not navigated anywhere
    pub fn blank_page(&self) -> MockPage {
        self.make_page()
    }

    fn make_page(&self) -> MockPage {
        self.state.pages_created.fetch_add(1, Ordering::SeqCst);
        let open = self.state.open_pages.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_open_pages.fetch_max(open, Ordering::SeqCst);
        self.state.events.lock().unwrap().push(PageEvent::Opened);
        MockPage {
            state: Arc::clone(&self.state),
            current: Arc::new(Mutex::new(None)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl BrowserDriver for MockBrowser {
    type Page = MockPage;

    async fn new_page(&self) -> Result<Option<MockPage>> {
        let next = self
            .state
            .creation_plan
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Creation::Page);

        match next {
            Creation::Page => Ok(Some(self.make_page())),
            Creation::Error => Err(anyhow!("Target.createTarget failed")),
            Creation::Empty => Ok(None),
            Creation::Panic => panic!("driver crashed while opening a tab"),
            Creation::Stalled => {
                let _orphan = self.make_page();
                std::future::pending().await
            }
        }
    }
}

/// Page state after the last navigation
#[derive(Debug, Clone)]
struct Loaded {
    url: String,
    title: Option<String>,
}

#[derive(Clone)]
pub struct MockPage {
    state: Arc<MockState>,
    current: Arc<Mutex<Option<Loaded>>>,
    closes: Arc<AtomicUsize>,
}

impl MockPage {
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn site(&self) -> Option<SiteScript> {
        let current = self.current.lock().unwrap().clone()?;
        self.state.sites.lock().unwrap().get(&current.url).cloned()
    }
}

impl PageDriver for MockPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.state
            .navigations
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
        self.state
            .events
            .lock()
            .unwrap()
            .push(PageEvent::Navigated(url.to_string()));

        let site = self.state.sites.lock().unwrap().get(url).cloned();
        let Some(site) = site else {
            return Err(anyhow!("net::ERR_NAME_NOT_RESOLVED"));
        };

        tokio::time::sleep(site.navigation_delay).await;

        let attempt = {
            let mut counts = self.state.navigation_counts.lock().unwrap();
            let count = counts.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        if attempt <= site.failed_navigations {
            return Err(anyhow!("net::ERR_CONNECTION_RESET"));
        }

        let untitled = attempt - site.failed_navigations <= site.untitled_navigations;
        *self.current.lock().unwrap() = Some(Loaded {
            url: url.to_string(),
            title: if untitled { Some(String::new()) } else { site.title.clone() },
        });
        Ok(())
    }

    async fn wait_for_load(&self) -> Result<()> {
        Ok(())
    }

    async fn page_title(&self) -> Result<Option<String>> {
        Ok(self
            .current
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|loaded| loaded.title.clone()))
    }

    async fn evaluate_to_string(&self, script: &str) -> Result<Option<String>> {
        self.state
            .evaluations
            .lock()
            .unwrap()
            .push(script.to_string());

        let site = self.site().unwrap_or_default();
        if script == MUTATION_PROBE_SCRIPT {
            let count = if site.mutating {
                self.state.mutation_counter.fetch_add(1, Ordering::SeqCst) + 1
            } else {
                self.state.mutation_counter.load(Ordering::SeqCst)
            };
            return Ok(Some(count.to_string()));
        }
        if script == TEXT_WALK_SCRIPT {
            return Ok(site.text_walk);
        }
        Ok(None)
    }

    async fn first_element_text(&self, selector: &str) -> Result<Option<String>> {
        self.state
            .selector_queries
            .lock()
            .unwrap()
            .push(selector.to_string());

        let site = self.site().unwrap_or_default();
        if selector == "body" {
            return Ok(site.body);
        }
        Ok(site.selector_text.get(selector).cloned())
    }

    async fn attribute_values(&self, selector: &str, _name: &str) -> Result<Vec<Option<String>>> {
        self.state
            .selector_queries
            .lock()
            .unwrap()
            .push(selector.to_string());

        let site = self.site().unwrap_or_default();
        Ok(site.hrefs.get(selector).cloned().unwrap_or_default())
    }

    async fn close_page(&self) -> Result<()> {
        let previous = self.closes.fetch_add(1, Ordering::SeqCst);
        self.state.pages_closed.fetch_add(1, Ordering::SeqCst);
        // Repeat closes of the same page do not free another slot
        if previous == 0 {
            self.state.open_pages.fetch_sub(1, Ordering::SeqCst);
        }
        self.state.events.lock().unwrap().push(PageEvent::Closed);
        Ok(())
    }
}

/// Default configuration; tests run on paused time so the real delays
/// cost nothing
pub fn test_config() -> FetchConfig {
    FetchConfig::default()
}

/// `len` characters of filler text
pub fn text_of_len(len: usize) -> String {
    "财经新闻内容".chars().cycle().take(len).collect()
}
