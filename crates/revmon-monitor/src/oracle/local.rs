use async_trait::async_trait;
use chrono::{DateTime, Utc};
use revmon_core::Review;
use revmon_db::DbError;
use sqlx::PgPool;

use super::NoveltyOracle;
use crate::error::OracleError;

/// Persistent set of recorded reviews keyed by review id.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn contains(&self, review_id: &str) -> Result<bool, DbError>;

    /// Inserts unless present; returns whether a row was written.
    async fn insert_if_absent(&self, review: &Review) -> Result<bool, DbError>;
}

/// [`ReviewStore`] over the Postgres `reviews` table.
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn contains(&self, review_id: &str) -> Result<bool, DbError> {
        revmon_db::review_exists(&self.pool, review_id).await
    }

    async fn insert_if_absent(&self, review: &Review) -> Result<bool, DbError> {
        revmon_db::insert_review_if_absent(&self.pool, review).await
    }
}

/// Local-store novelty: a review is known if its id is recorded or it is
/// older than `min_date`.
///
/// Without `min_date` novelty is purely identity-based, so a first run
/// backfills the whole history.
pub struct LocalStoreOracle<S> {
    store: S,
    min_date: Option<DateTime<Utc>>,
}

impl<S: ReviewStore> LocalStoreOracle<S> {
    pub fn new(store: S, min_date: Option<DateTime<Utc>>) -> Self {
        Self { store, min_date }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn is_out_of_window(&self, review: &Review) -> bool {
        self.min_date
            .is_some_and(|min_date| review.timestamp < min_date)
    }
}

#[async_trait]
impl<S: ReviewStore> NoveltyOracle for LocalStoreOracle<S> {
    async fn is_already_known(&self, review: &Review) -> Result<bool, OracleError> {
        if self.is_out_of_window(review) {
            tracing::debug!(review_id = %review.id, "review is older than the minimum date");
            return Ok(true);
        }
        Ok(self.store.contains(&review.id).await?)
    }

    async fn record(&self, review: &Review) -> Result<(), OracleError> {
        if !self.store.insert_if_absent(review).await? {
            tracing::debug!(review_id = %review.id, "review was already recorded");
        }
        Ok(())
    }
}
