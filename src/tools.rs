//! Tool-invocation boundary
//!
//! `StockNewsTools` is what the agent layer calls. It owns no global state:
//! the configuration and the analysis backend are handed in by the caller,
//! and every search opens and closes its own browser session.

use std::future::Future;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::config::FetchConfig;
use crate::deadline::Deadline;
use crate::errors::{ScrapeError, ScrapeResult};
use crate::pipeline::collect;
use crate::records::{ContentRecord, parse_records};
use crate::resolvers::{ChannelResolver, SearchTableResolver, SiteResolver, validate_keyword};
use crate::session::BrowserSession;
use crate::utils::constants::MAX_ANALYSIS_RECORDS;

/// Returned instead of an analysis when there is nothing to analyze
pub const NO_RESULTS_MESSAGE: &str =
    "未找到相关新闻，请先使用 search_stock_news 或 search_stock_pages 搜索后再试。";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeywordArgs {
    /// Stock name or code to search for, e.g. 腾讯, 阿里巴巴, AAPL
    pub keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeArgs {
    /// Stock name or code the records are about
    pub keyword: String,

    /// Records from an earlier search: an array of `{title, content, url,
    /// fetchedAt}` objects or a JSON string encoding one
    #[serde(default)]
    pub news_items: Option<Value>,
}

/// The agent layer's analysis capability
pub trait AnalysisBackend: Send + Sync {
    fn analyze(
        &self,
        keyword: &str,
        records: &[ContentRecord],
    ) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// Backend for hosts that only search
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnalysis;

impl AnalysisBackend for NoAnalysis {
    async fn analyze(&self, _keyword: &str, _records: &[ContentRecord]) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("no analysis backend configured"))
    }
}

/// Name, description and input schema the invocation layer advertises
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub read_only: bool,
    pub input_schema: Value,
}

fn schema_value<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or(Value::Null)
}

#[must_use]
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "search_stock_news",
            description: "Search the Cailian Press telegram channel for a stock keyword and \
                          return the extracted page text as records of title, content, url \
                          and fetchedAt.",
            read_only: true,
            input_schema: schema_value::<KeywordArgs>(),
        },
        ToolDescriptor {
            name: "search_stock_pages",
            description: "Search xueqiu for a stock keyword, open every matching stock page \
                          and return its extracted text as records.",
            read_only: true,
            input_schema: schema_value::<KeywordArgs>(),
        },
        ToolDescriptor {
            name: "analyze_stock_news",
            description: "Analyze previously fetched records for a stock keyword. At most the \
                          first 20 records are used.",
            read_only: true,
            input_schema: schema_value::<AnalyzeArgs>(),
        },
    ]
}

pub struct StockNewsTools<B: AnalysisBackend> {
    config: FetchConfig,
    backend: B,
    channel: ChannelResolver,
    search_table: SearchTableResolver,
}

impl<B: AnalysisBackend> StockNewsTools<B> {
    /// Tools wired to the telegram channel and xueqiu search
    pub fn new(config: FetchConfig, backend: B) -> Self {
        Self::with_resolvers(
            config,
            backend,
            ChannelResolver::cls_telegram(),
            SearchTableResolver::xueqiu(),
        )
    }

    pub fn with_resolvers(
        config: FetchConfig,
        backend: B,
        channel: ChannelResolver,
        search_table: SearchTableResolver,
    ) -> Self {
        Self {
            config,
            backend,
            channel,
            search_table,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Channel search: one fixed query page per keyword
    pub async fn search_stock_news(
        &self,
        args: KeywordArgs,
        deadline: &Deadline,
    ) -> ScrapeResult<Vec<ContentRecord>> {
        self.search(&self.channel, &args.keyword, deadline).await
    }

    /// Search-table search: every stock page linked from the results
    pub async fn search_stock_pages(
        &self,
        args: KeywordArgs,
        deadline: &Deadline,
    ) -> ScrapeResult<Vec<ContentRecord>> {
        self.search(&self.search_table, &args.keyword, deadline).await
    }

    async fn search<R: SiteResolver>(
        &self,
        resolver: &R,
        keyword: &str,
        deadline: &Deadline,
    ) -> ScrapeResult<Vec<ContentRecord>> {
        // Reject bad input before paying for a browser launch
        let keyword = validate_keyword(keyword)?;

        let mut session = BrowserSession::open(&self.config, deadline).await?;
        let session_deadline = session.deadline().clone();
        let outcome = collect(&session, resolver, &keyword, &self.config, &session_deadline).await;
        session.close().await;
        outcome
    }

    /// Analyze loosely shaped records; an empty list yields
    /// [`NO_RESULTS_MESSAGE`] without calling the backend
    pub async fn analyze_stock_news(&self, args: AnalyzeArgs) -> ScrapeResult<String> {
        let keyword = validate_keyword(&args.keyword)?;
        let mut records = parse_records(args.news_items.as_ref());
        if records.is_empty() {
            info!("No records to analyze for '{keyword}'");
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        if records.len() > MAX_ANALYSIS_RECORDS {
            info!(
                "Analyzing first {MAX_ANALYSIS_RECORDS} of {} records",
                records.len()
            );
            records.truncate(MAX_ANALYSIS_RECORDS);
        }

        self.backend
            .analyze(&keyword, &records)
            .await
            .map_err(|e| ScrapeError::Analysis(format!("{e:#}")))
    }
}
