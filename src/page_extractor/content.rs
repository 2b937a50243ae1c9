//! Layered main-content extraction
//!
//! Strategies are tried in a fixed order and the first one producing
//! enough text wins:
//! 1. text-node walk over the body (script/style/noscript removed)
//! 2. the first matching well-known content selector
//! 3. the body's rendered text, accepted whatever its length
//!
//! Extraction never fails. A page that yields nothing produces an empty
//! body, which the caller still records.

use std::fmt;

use tracing::{debug, trace};

use super::js_scripts::TEXT_WALK_SCRIPT;
use super::normalize::{clean_evaluated_text, normalize_content};
use crate::config::FetchConfig;
use crate::driver::PageDriver;
use crate::utils::string_utils::char_len;

/// Well-known main-content containers, most specific first
pub const CONTENT_SELECTORS: [&str; 8] = [
    "article",
    ".article-content",
    ".content",
    "#content",
    ".post-content",
    ".news-content",
    "main",
    ".main-content",
];

/// Which strategy produced the extracted body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    TextWalk,
    Selector(&'static str),
    Body,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextWalk => f.write_str("text walk"),
            Self::Selector(selector) => write!(f, "selector '{selector}'"),
            Self::Body => f.write_str("body text"),
        }
    }
}

/// Character bounds applied during extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLimits {
    /// A strategy must produce strictly more than this to be accepted
    pub min_chars: usize,
    /// Normalized bodies longer than this are truncated
    pub max_chars: usize,
}

impl ContentLimits {
    #[must_use]
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            min_chars: config.min_content_chars(),
            max_chars: config.max_content_chars(),
        }
    }
}

/// Normalized body plus the strategy that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub content: String,
    pub strategy: ExtractionStrategy,
}

/// Extract and normalize the main readable text of an already-loaded page
pub async fn extract_content<P: PageDriver>(page: &P, limits: ContentLimits) -> Extraction {
    let (raw, strategy) = extract_raw(page, limits.min_chars).await;
    let content = normalize_content(&raw, limits.max_chars);
    debug!(
        "Extracted {} chars via {}",
        char_len(&content),
        strategy
    );
    Extraction { content, strategy }
}

async fn extract_raw<P: PageDriver>(page: &P, min_chars: usize) -> (String, ExtractionStrategy) {
    match page.evaluate_to_string(TEXT_WALK_SCRIPT).await {
        Ok(Some(raw)) => {
            let text = clean_evaluated_text(&raw);
            if char_len(&text) > min_chars {
                return (text, ExtractionStrategy::TextWalk);
            }
            trace!("Text walk produced only {} chars", char_len(&text));
        }
        Ok(None) => trace!("Text walk returned no value"),
        Err(e) => debug!("Text walk failed: {e:#}"),
    }

    for selector in CONTENT_SELECTORS {
        match page.first_element_text(selector).await {
            Ok(Some(text)) if char_len(&text) > min_chars => {
                return (text, ExtractionStrategy::Selector(selector));
            }
            Ok(_) => {}
            Err(e) => trace!("Selector '{selector}' failed: {e:#}"),
        }
    }

    let body = match page.first_element_text("body").await {
        Ok(text) => text.unwrap_or_default(),
        Err(e) => {
            debug!("Body text unavailable: {e:#}");
            String::new()
        }
    };
    (body, ExtractionStrategy::Body)
}
