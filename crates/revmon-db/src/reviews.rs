//! Database operations for the `reviews` table, the local record of every
//! review the monitor has accepted as new.

use chrono::{DateTime, Utc};
use revmon_core::Review;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub review_id: String,
    pub reviewed_at: DateTime<Utc>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub rating: Option<f64>,
    pub target_name: String,
    pub target_address: String,
    pub created_at: DateTime<Utc>,
}

/// Returns `true` if a review with `review_id` has already been recorded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn review_exists(pool: &PgPool, review_id: &str) -> Result<bool, DbError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM reviews WHERE review_id = $1)",
    )
    .bind(review_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Records `review` unless a row with the same `review_id` already exists.
///
/// Returns `true` when a new row was written. Repeated or concurrent calls
/// for the same review leave exactly one row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_review_if_absent(pool: &PgPool, review: &Review) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO reviews \
             (review_id, reviewed_at, body, author, rating, target_name, target_address) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (review_id) DO NOTHING",
    )
    .bind(&review.id)
    .bind(review.timestamp)
    .bind(review.text.as_deref())
    .bind(review.author.as_deref())
    .bind(review.rating)
    .bind(&review.target_name)
    .bind(&review.target_address)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Fetches a recorded review by its source identifier.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matches, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn get_review(pool: &PgPool, review_id: &str) -> Result<ReviewRow, DbError> {
    sqlx::query_as::<_, ReviewRow>(
        "SELECT id, review_id, reviewed_at, body, author, rating, \
                target_name, target_address, created_at \
         FROM reviews \
         WHERE review_id = $1",
    )
    .bind(review_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}
