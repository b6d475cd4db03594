use std::time::Duration;

use revmon_core::FailureKind;
use revmon_db::DbError;
use revmon_scraper::ScraperError;
use thiserror::Error;

/// Errors raised while deciding whether a review is new.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("arbiter unavailable: HTTP {status} from {url}")]
    ArbiterUnavailable { status: u16, url: String },

    #[error("arbiter HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid arbiter URL \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("review store error: {0}")]
    Store(#[from] DbError),
}

/// Target-level failures. Each one stops the current target only.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("sorting reviews by newest failed with status {status}")]
    FeedSort { status: i32 },

    #[error("sort request failed: {0}")]
    FeedSortRequest(#[source] ScraperError),

    #[error("failed to fetch reviews at offset {offset}: {source}")]
    FeedFetch {
        offset: usize,
        #[source]
        source: ScraperError,
    },

    #[error("novelty check failed for review {review_id}: {source}")]
    Oracle {
        review_id: String,
        #[source]
        source: OracleError,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("feed still had reviews after {max_pages} pages")]
    PaginationLimit { max_pages: usize },
}

impl MonitorError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            MonitorError::FeedSort { .. } => FailureKind::FeedSort,
            MonitorError::FeedSortRequest(_) | MonitorError::FeedFetch { .. } => {
                FailureKind::FeedFetch
            }
            MonitorError::Oracle { .. } => FailureKind::Oracle,
            MonitorError::Timeout { .. } => FailureKind::Timeout,
            MonitorError::PaginationLimit { .. } => FailureKind::PaginationLimit,
        }
    }
}

/// A failed target together with the reviews accepted before it failed.
#[derive(Debug, Error)]
#[error("{error} (after {partial_count} new reviews)")]
pub struct TargetFailure {
    #[source]
    pub error: MonitorError,
    pub partial_count: u64,
}
