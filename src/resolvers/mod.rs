//! Keyword to fetch-target resolution
//!
//! Two strategies share one trait: [`ChannelResolver`] fills a fixed URL
//! template and never touches the browser, [`SearchTableResolver`] scrapes
//! a search-results page for candidate links.

pub mod channel;
pub mod search_table;

use std::future::Future;

use crate::config::FetchConfig;
use crate::deadline::Deadline;
use crate::driver::BrowserDriver;
use crate::errors::{ScrapeError, ScrapeResult};
use crate::records::FetchTarget;
use crate::utils::constants::MAX_KEYWORD_CHARS;
use crate::utils::string_utils::char_len;

pub use channel::ChannelResolver;
pub use search_table::{SearchTableResolver, XUEQIU_SELECTORS};

/// Turns a keyword into an ordered list of fetch targets
pub trait SiteResolver: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Resolve `keyword` (already validated) into fetch targets
    ///
    /// An empty list is a valid outcome, not an error.
    fn resolve<B: BrowserDriver>(
        &self,
        browser: &B,
        keyword: &str,
        config: &FetchConfig,
        deadline: &Deadline,
    ) -> impl Future<Output = ScrapeResult<Vec<FetchTarget>>> + Send;
}

/// Trim a user-supplied keyword and reject empty or oversized input
pub fn validate_keyword(keyword: &str) -> ScrapeResult<String> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Err(ScrapeError::InvalidKeyword(
            "keyword must not be empty".to_string(),
        ));
    }
    if char_len(trimmed) > MAX_KEYWORD_CHARS {
        return Err(ScrapeError::InvalidKeyword(format!(
            "keyword exceeds {MAX_KEYWORD_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}
