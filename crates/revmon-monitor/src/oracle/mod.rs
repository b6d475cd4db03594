//! Novelty strategies: a local review store with an optional date cutoff,
//! or a remote arbiter that ingests each candidate and returns a verdict.

mod local;
mod remote;

use async_trait::async_trait;
use revmon_core::Review;

use crate::error::OracleError;

pub use local::{LocalStoreOracle, PgReviewStore, ReviewStore};
pub use remote::RemoteArbiterOracle;

/// Decides whether a review has already been seen.
///
/// Called once per review in feed order for a single target at a time.
/// `is_already_known` must not mutate state: asking twice about the same
/// review gives the same answer.
#[async_trait]
pub trait NoveltyOracle: Send + Sync {
    /// `true` stops the current target.
    async fn is_already_known(&self, review: &Review) -> Result<bool, OracleError>;

    /// Persists a review that was judged new. Must tolerate repeats.
    async fn record(&self, review: &Review) -> Result<(), OracleError>;
}
