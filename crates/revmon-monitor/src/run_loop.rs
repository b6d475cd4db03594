use async_trait::async_trait;
use revmon_core::{FailureKind, RunSummary, Target, TargetOutcome};

use crate::feed::PaginatedFeed;
use crate::monitor::IncrementalMonitor;
use crate::oracle::NoveltyOracle;

/// Receives each target's summary as soon as it is known.
#[async_trait]
pub trait SummarySink: Send + Sync {
    async fn record(&self, summary: &RunSummary);
}

/// Writes one log line per target summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl SummarySink for TracingSink {
    async fn record(&self, summary: &RunSummary) {
        let address = &summary.target.address;
        match &summary.outcome {
            TargetOutcome::Succeeded { new_review_count } => {
                tracing::info!(
                    target_address = %address,
                    target_name = %summary.target.name,
                    new_reviews = new_review_count,
                    "{address} : {new_review_count} new reviews"
                );
            }
            TargetOutcome::Failed {
                kind: FailureKind::FeedSort,
                reason,
                ..
            } => {
                tracing::warn!(
                    target_address = %address,
                    error = %reason,
                    "sorting reviews failed for {address}"
                );
            }
            TargetOutcome::Failed {
                kind,
                reason,
                partial_count,
            } => {
                tracing::error!(
                    target_address = %address,
                    kind = %kind,
                    partial_count,
                    error = %reason,
                    "monitoring failed for {address}"
                );
            }
        }
    }
}

/// Runs every target through the monitor, one at a time, in list order.
///
/// This is the only place a target's failure is caught: it becomes a
/// `Failed` summary and the loop moves on.
pub struct RunLoop<F, O> {
    monitor: IncrementalMonitor,
    feed: F,
    oracle: O,
}

impl<F, O> RunLoop<F, O>
where
    F: PaginatedFeed,
    O: NoveltyOracle,
{
    pub fn new(monitor: IncrementalMonitor, feed: F, oracle: O) -> Self {
        Self {
            monitor,
            feed,
            oracle,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Monitors all `targets` and returns their summaries in input order.
    pub async fn run_all(&self, targets: &[Target], sink: &dyn SummarySink) -> Vec<RunSummary> {
        let mut summaries = Vec::with_capacity(targets.len());

        for target in targets {
            let summary = match self.monitor.run(target, &self.feed, &self.oracle).await {
                Ok(outcome) => RunSummary::succeeded(target.clone(), outcome.new_review_count),
                Err(failure) => RunSummary::failed(
                    target.clone(),
                    failure.error.kind(),
                    failure.error.to_string(),
                    failure.partial_count,
                ),
            };
            sink.record(&summary).await;
            summaries.push(summary);
        }

        let failed = summaries.iter().filter(|s| s.is_failed()).count();
        let new_reviews: u64 = summaries.iter().filter_map(RunSummary::new_review_count).sum();
        tracing::info!(
            targets = summaries.len(),
            failed,
            new_reviews,
            "monitor run finished"
        );

        summaries
    }
}
