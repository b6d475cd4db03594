//! Run ledger for local-store runs: one `monitor_runs` row per invocation
//! plus one `monitor_run_targets` row per target summary.

use async_trait::async_trait;
use revmon_core::{RunSummary, TargetOutcome};
use revmon_monitor::{SummarySink, TracingSink};
use sqlx::PgPool;

/// How a finished run should be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunVerdict {
    Completed { new_reviews: i32 },
    Failed { message: String },
}

/// A run fails only when every target failed; an empty target list completes.
pub(crate) fn run_verdict(summaries: &[RunSummary]) -> RunVerdict {
    let failed = summaries.iter().filter(|s| s.is_failed()).count();
    if !summaries.is_empty() && failed == summaries.len() {
        return RunVerdict::Failed {
            message: format!("all {failed} targets failed"),
        };
    }

    let total: u64 = summaries.iter().filter_map(RunSummary::new_review_count).sum();
    RunVerdict::Completed {
        new_reviews: i32::try_from(total).unwrap_or(i32::MAX),
    }
}

pub(crate) struct PgRunLedger {
    pool: PgPool,
    run_id: i64,
}

impl PgRunLedger {
    /// Creates the run row and moves it to `running`.
    pub(crate) async fn open(pool: PgPool, oracle: &str) -> Result<Self, revmon_db::DbError> {
        let run = revmon_db::create_monitor_run(&pool, oracle, "cli").await?;
        if let Err(e) = revmon_db::start_monitor_run(&pool, run.id).await {
            fail_run_best_effort(&pool, run.id, format!("{e:#}")).await;
            return Err(e);
        }
        tracing::debug!(run_id = run.id, public_id = %run.public_id, "monitor run started");
        Ok(Self {
            pool,
            run_id: run.id,
        })
    }

    pub(crate) async fn finish(&self, summaries: &[RunSummary]) {
        match run_verdict(summaries) {
            RunVerdict::Completed { new_reviews } => {
                if let Err(e) =
                    revmon_db::complete_monitor_run(&self.pool, self.run_id, new_reviews).await
                {
                    tracing::error!(run_id = self.run_id, error = %e, "failed to complete monitor run");
                    fail_run_best_effort(&self.pool, self.run_id, format!("{e:#}")).await;
                }
            }
            RunVerdict::Failed { message } => {
                fail_run_best_effort(&self.pool, self.run_id, message).await;
            }
        }
    }
}

#[async_trait]
impl SummarySink for PgRunLedger {
    async fn record(&self, summary: &RunSummary) {
        TracingSink.record(summary).await;

        let (status, new_reviews, error_message) = match &summary.outcome {
            TargetOutcome::Succeeded { new_review_count } => {
                ("succeeded", *new_review_count, None)
            }
            TargetOutcome::Failed {
                kind,
                reason,
                partial_count,
            } => ("failed", *partial_count, Some(format!("{kind}: {reason}"))),
        };

        if let Err(e) = revmon_db::upsert_monitor_run_target(
            &self.pool,
            self.run_id,
            &summary.target.name,
            &summary.target.address,
            status,
            i32::try_from(new_reviews).unwrap_or(i32::MAX),
            error_message.as_deref(),
        )
        .await
        {
            tracing::warn!(
                run_id = self.run_id,
                target_address = %summary.target.address,
                error = %e,
                "failed to record target outcome"
            );
        }
    }
}

async fn fail_run_best_effort(pool: &PgPool, run_id: i64, message: String) {
    if let Err(mark_err) = revmon_db::fail_monitor_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            "failed to mark monitor run as failed"
        );
    }
}
