//! Fixed-template news channel resolver

use tracing::debug;

use super::SiteResolver;
use crate::config::FetchConfig;
use crate::deadline::Deadline;
use crate::driver::BrowserDriver;
use crate::errors::ScrapeResult;
use crate::records::FetchTarget;
use crate::utils::url_utils::fill_keyword_template;

/// Resolves a keyword to exactly one channel URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelResolver {
    url_template: String,
    label_suffix: String,
}

impl ChannelResolver {
    /// `url_template` must contain `{keyword}`; the label is the keyword
    /// followed by `label_suffix`
    pub fn new(url_template: impl Into<String>, label_suffix: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            label_suffix: label_suffix.into(),
        }
    }

    /// Cailian Press telegram (flash news) channel
    #[must_use]
    pub fn cls_telegram() -> Self {
        Self::new(
            "https://www.cls.cn/searchPage?keyword={keyword}&type=telegram",
            "-电报频道",
        )
    }

    /// Cailian Press in-depth articles channel
    #[must_use]
    pub fn cls_depth() -> Self {
        Self::new(
            "https://www.cls.cn/searchPage?keyword={keyword}&type=depth",
            "-深度",
        )
    }

    #[must_use]
    pub fn target_for(&self, keyword: &str) -> FetchTarget {
        FetchTarget::new(
            fill_keyword_template(&self.url_template, keyword),
            format!("{keyword}{}", self.label_suffix),
        )
    }
}

impl SiteResolver for ChannelResolver {
    fn name(&self) -> &str {
        "channel"
    }

    async fn resolve<B: BrowserDriver>(
        &self,
        _browser: &B,
        keyword: &str,
        _config: &FetchConfig,
        deadline: &Deadline,
    ) -> ScrapeResult<Vec<FetchTarget>> {
        deadline.check("target resolution")?;
        let target = self.target_for(keyword);
        debug!("Channel target for '{keyword}': {}", target.url);
        Ok(vec![target])
    }
}
