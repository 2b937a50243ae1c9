//! Keyword to records: resolution followed by the sequential fetch

use tracing::info;

use crate::aggregator::fetch_all;
use crate::config::FetchConfig;
use crate::deadline::Deadline;
use crate::driver::BrowserDriver;
use crate::errors::ScrapeResult;
use crate::records::ContentRecord;
use crate::resolvers::{SiteResolver, validate_keyword};

/// Resolve `keyword` with `resolver` and fetch every resulting target
///
/// Resolution errors and a deadline that is already spent fail the whole
/// operation; per-target failures never do. Zero targets is `Ok(vec![])`.
pub async fn collect<B, R>(
    browser: &B,
    resolver: &R,
    keyword: &str,
    config: &FetchConfig,
    deadline: &Deadline,
) -> ScrapeResult<Vec<ContentRecord>>
where
    B: BrowserDriver,
    R: SiteResolver,
{
    let keyword = validate_keyword(keyword)?;
    deadline.check("search")?;

    let targets = resolver.resolve(browser, &keyword, config, deadline).await?;
    if targets.is_empty() {
        info!("{} resolver found no targets for '{keyword}'", resolver.name());
        return Ok(Vec::new());
    }

    info!(
        "{} resolver produced {} targets for '{keyword}'",
        resolver.name(),
        targets.len()
    );
    let records = fetch_all(browser, &targets, config, deadline).await;
    info!(
        "Collected {}/{} records for '{keyword}'",
        records.len(),
        targets.len()
    );
    Ok(records)
}
