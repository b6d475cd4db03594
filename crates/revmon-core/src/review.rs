use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A monitored listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Display name; empty when the target list carries bare addresses.
    pub name: String,
    /// Canonical page URL, unique within a run.
    pub address: String,
}

impl Target {
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            f.write_str(&self.address)
        } else {
            write!(f, "{} ({})", self.name, self.address)
        }
    }
}

/// A single observed review.
///
/// The serialized form is the payload submitted to the remote arbiter:
/// payload fields pass through untouched and the provenance fields are
/// named `placeUrl` / `placeName`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "id_review")]
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "caption")]
    pub text: Option<String>,
    #[serde(rename = "username")]
    pub author: Option<String>,
    pub rating: Option<f64>,
    #[serde(rename = "placeName", default)]
    pub target_name: String,
    #[serde(rename = "placeUrl", default)]
    pub target_address: String,
}

impl Review {
    /// Stamps the review with the target it was observed on.
    pub fn attach_provenance(&mut self, target: &Target) {
        self.target_name.clone_from(&target.name);
        self.target_address.clone_from(&target.address);
    }
}

/// Which stage of monitoring a target failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The source reported a non-zero status when re-sorting newest-first.
    FeedSort,
    /// A page could not be fetched or decoded.
    FeedFetch,
    /// The novelty oracle (store or arbiter) failed.
    Oracle,
    /// A feed or oracle call exceeded its time bound.
    Timeout,
    /// The feed kept yielding pages past the configured limit.
    PaginationLimit,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::FeedSort => write!(f, "feed_sort"),
            FailureKind::FeedFetch => write!(f, "feed_fetch"),
            FailureKind::Oracle => write!(f, "oracle"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::PaginationLimit => write!(f, "pagination_limit"),
        }
    }
}

/// Per-target result of one monitoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetOutcome {
    Succeeded {
        new_review_count: u64,
    },
    /// `partial_count` is the number of reviews accepted before the failure;
    /// it is not an authoritative new-review count.
    Failed {
        kind: FailureKind,
        reason: String,
        partial_count: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub target: Target,
    pub outcome: TargetOutcome,
}

impl RunSummary {
    #[must_use]
    pub fn succeeded(target: Target, new_review_count: u64) -> Self {
        Self {
            target,
            outcome: TargetOutcome::Succeeded { new_review_count },
        }
    }

    #[must_use]
    pub fn failed(
        target: Target,
        kind: FailureKind,
        reason: impl Into<String>,
        partial_count: u64,
    ) -> Self {
        Self {
            target,
            outcome: TargetOutcome::Failed {
                kind,
                reason: reason.into(),
                partial_count,
            },
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, TargetOutcome::Failed { .. })
    }

    /// New reviews counted for a clean run; `None` for a failed target.
    #[must_use]
    pub fn new_review_count(&self) -> Option<u64> {
        match self.outcome {
            TargetOutcome::Succeeded { new_review_count } => Some(new_review_count),
            TargetOutcome::Failed { .. } => None,
        }
    }
}
