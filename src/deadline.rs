//! Explicit deadlines threaded through the pipeline
//!
//! Every blocking step receives a `Deadline` instead of relying on ambient
//! timeouts. Components derive their own sub-deadlines: `child` can only
//! shrink the parent's budget, while `detached` gets a fresh budget of its
//! own. Both share the parent's cancellation token, so an explicit
//! `cancel()` at the top still reaches every in-flight step.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::{ScrapeError, ScrapeResult};

#[derive(Debug, Clone)]
pub struct Deadline {
    started_at: Instant,
    expires_at: Instant,
    token: CancellationToken,
}

impl Deadline {
    /// Root deadline expiring `budget` from now
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self::with_token(budget, CancellationToken::new())
    }

    /// Root deadline bound to a caller-owned cancellation token
    #[must_use]
    pub fn with_token(budget: Duration, token: CancellationToken) -> Self {
        let now = Instant::now();
        Self {
            started_at: now,
            expires_at: now + budget,
            token,
        }
    }

    /// Sub-deadline that never outlives `self`
    #[must_use]
    pub fn child(&self, budget: Duration) -> Self {
        let now = Instant::now();
        Self {
            started_at: now,
            expires_at: self.expires_at.min(now + budget),
            token: self.token.child_token(),
        }
    }

    /// Sub-deadline with an independent budget; only explicit cancellation
    /// of `self` propagates into it
    #[must_use]
    pub fn detached(&self, budget: Duration) -> Self {
        let now = Instant::now();
        Self {
            started_at: now,
            expires_at: now + budget,
            token: self.token.child_token(),
        }
    }

    #[must_use]
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel this deadline and everything derived from it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Resolves once this deadline is explicitly cancelled
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Fail fast if the deadline is already cancelled or expired
    pub fn check(&self, what: &str) -> ScrapeResult<()> {
        if self.is_cancelled() {
            return Err(ScrapeError::Cancelled(what.to_string()));
        }
        if self.is_expired() {
            return Err(ScrapeError::DeadlineExceeded {
                what: what.to_string(),
                elapsed: self.elapsed(),
            });
        }
        Ok(())
    }

    /// Run `operation` until it completes, the deadline expires, or the
    /// deadline is cancelled, whichever happens first
    pub async fn run<F, T>(&self, operation: F, what: &str) -> ScrapeResult<T>
    where
        F: Future<Output = T>,
    {
        self.check(what)?;
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ScrapeError::Cancelled(what.to_string())),
            () = tokio::time::sleep_until(self.expires_at) => Err(ScrapeError::DeadlineExceeded {
                what: what.to_string(),
                elapsed: self.elapsed(),
            }),
            out = operation => Ok(out),
        }
    }

    /// Run `operation` until it completes or the deadline is cancelled
    ///
    /// Expiry is not enforced here; callers bound the operation with their
    /// own timeout and check expiry between steps.
    pub async fn until_cancelled<F, T>(&self, operation: F, what: &str) -> ScrapeResult<T>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(ScrapeError::Cancelled(what.to_string()));
        }
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ScrapeError::Cancelled(what.to_string())),
            out = operation => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_child_never_outlives_parent() {
        let parent = Deadline::after(Duration::from_secs(10));
        let child = parent.child(Duration::from_secs(60));
        assert_eq!(child.expires_at(), parent.expires_at());

        let shorter = parent.child(Duration::from_secs(1));
        assert!(shorter.expires_at() < parent.expires_at());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_has_own_budget_but_shares_cancellation() {
        let parent = Deadline::after(Duration::from_secs(1));
        let item = parent.detached(Duration::from_secs(60));
        assert!(item.expires_at() > parent.expires_at());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(parent.is_expired());
        assert!(!item.is_expired());

        parent.cancel();
        assert!(item.is_cancelled());
        assert!(matches!(item.check("fetch"), Err(ScrapeError::Cancelled(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let deadline = Deadline::after(Duration::from_secs(5));
        let result = deadline
            .run(tokio::time::sleep(Duration::from_secs(30)), "slow step")
            .await;
        assert!(matches!(result, Err(ScrapeError::DeadlineExceeded { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_observes_cancellation() {
        let deadline = Deadline::after(Duration::from_secs(60));
        let canceller = deadline.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });
        let result = deadline
            .run(tokio::time::sleep(Duration::from_secs(30)), "navigation")
            .await;
        assert!(matches!(result, Err(ScrapeError::Cancelled(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_passes_through_output() {
        let deadline = Deadline::after(Duration::from_secs(5));
        let value = deadline.run(async { 42 }, "compute").await.unwrap();
        assert_eq!(value, 42);
    }
}
