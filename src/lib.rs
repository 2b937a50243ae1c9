pub mod aggregator;
pub mod browser_setup;
pub mod config;
pub mod deadline;
pub mod driver;
pub mod errors;
pub mod navigation_retry;
pub mod page_extractor;
pub mod page_lifecycle;
pub mod pipeline;
pub mod records;
pub mod resolvers;
pub mod session;
pub mod tools;
pub mod utils;

pub use aggregator::{fetch_all, fetch_content};
pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{FailurePolicy, FetchConfig, FetchConfigBuilder};
pub use deadline::Deadline;
pub use driver::{BrowserDriver, PageDriver};
pub use errors::{ScrapeError, ScrapeResult};
pub use navigation_retry::{RetryPolicy, navigate_with_retry};
pub use page_extractor::{ContentLimits, Extraction, ExtractionStrategy, extract_content};
pub use page_lifecycle::{NavigateOptions, PageGuard, create_page, navigate_and_verify};
pub use pipeline::collect;
pub use records::{ContentRecord, FetchTarget, parse_records};
pub use resolvers::{ChannelResolver, SearchTableResolver, SiteResolver, validate_keyword};
pub use session::BrowserSession;
pub use tools::{
    AnalysisBackend, AnalyzeArgs, KeywordArgs, NO_RESULTS_MESSAGE, NoAnalysis, StockNewsTools,
    ToolDescriptor, tool_descriptors,
};
