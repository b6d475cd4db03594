use std::future::Future;
use std::time::Duration;

use revmon_core::Target;

use crate::error::{MonitorError, TargetFailure};
use crate::feed::PaginatedFeed;
use crate::oracle::NoveltyOracle;

pub const DEFAULT_MAX_PAGES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorOutcome {
    pub new_review_count: u64,
}

/// Walks one target's newest-first feed and counts the reviews in front of
/// the first one the oracle already knows.
///
/// Because the feed is newest-first, everything after the first known (or
/// too old) review is assumed known too, so a steady-state run touches only
/// what was posted since the previous run. A feed that is not actually
/// sorted stops early; that is accepted, not detected.
#[derive(Debug, Clone)]
pub struct IncrementalMonitor {
    call_timeout: Duration,
    max_pages: usize,
}

impl IncrementalMonitor {
    /// `call_timeout` bounds every individual feed and oracle call.
    /// `max_pages` is clamped to at least 1.
    #[must_use]
    pub fn new(call_timeout: Duration, max_pages: usize) -> Self {
        Self {
            call_timeout,
            max_pages: max_pages.max(1),
        }
    }

    /// Monitors a single target.
    ///
    /// Each review judged new is recorded through the oracle before it is
    /// counted.
    ///
    /// # Errors
    ///
    /// Returns a [`TargetFailure`] carrying the count accumulated before the
    /// failure when the sort is rejected, a page cannot be fetched, the
    /// oracle fails, a call times out, or the page limit is exceeded.
    pub async fn run<F, O>(
        &self,
        target: &Target,
        feed: &F,
        oracle: &O,
    ) -> Result<MonitorOutcome, TargetFailure>
    where
        F: PaginatedFeed + ?Sized,
        O: NoveltyOracle + ?Sized,
    {
        let mut count = 0;
        match self.scan(target, feed, oracle, &mut count).await {
            Ok(()) => Ok(MonitorOutcome {
                new_review_count: count,
            }),
            Err(error) => Err(TargetFailure {
                error,
                partial_count: count,
            }),
        }
    }

    async fn scan<F, O>(
        &self,
        target: &Target,
        feed: &F,
        oracle: &O,
        count: &mut u64,
    ) -> Result<(), MonitorError>
    where
        F: PaginatedFeed + ?Sized,
        O: NoveltyOracle + ?Sized,
    {
        let status = self
            .bounded("sort", feed.sort_by_newest(target))
            .await?
            .map_err(MonitorError::FeedSortRequest)?;
        if status != 0 {
            return Err(MonitorError::FeedSort { status });
        }

        let mut offset = 0;
        let mut page_count = 0usize;
        loop {
            let batch = self
                .bounded("page fetch", feed.fetch_page(target, offset))
                .await?
                .map_err(|source| MonitorError::FeedFetch { offset, source })?;
            if batch.is_empty() {
                return Ok(());
            }

            // Only a non-empty page past the limit is a runaway feed.
            page_count += 1;
            if page_count > self.max_pages {
                return Err(MonitorError::PaginationLimit {
                    max_pages: self.max_pages,
                });
            }
            let batch_len = batch.len();

            for mut review in batch {
                review.attach_provenance(target);

                let known = self
                    .bounded("novelty check", oracle.is_already_known(&review))
                    .await?
                    .map_err(|source| MonitorError::Oracle {
                        review_id: review.id.clone(),
                        source,
                    })?;
                if known {
                    tracing::debug!(
                        target_address = %target.address,
                        review_id = %review.id,
                        offset,
                        "reached a known review"
                    );
                    return Ok(());
                }

                self.bounded("review record", oracle.record(&review))
                    .await?
                    .map_err(|source| MonitorError::Oracle {
                        review_id: review.id.clone(),
                        source,
                    })?;
                *count += 1;
            }

            offset += batch_len;
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = T>,
    ) -> Result<T, MonitorError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| MonitorError::Timeout {
                operation,
                after: self.call_timeout,
            })
    }
}

impl Default for IncrementalMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(120), DEFAULT_MAX_PAGES)
    }
}
