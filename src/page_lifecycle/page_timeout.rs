//! Timeout wrapper for single page operations

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Bound one driver call so a wedged page can never hang the pipeline
///
/// The error message distinguishes a timeout from a failure of the
/// operation itself.
pub async fn with_page_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {} seconds",
            timeout.as_secs()
        )),
    }
}
