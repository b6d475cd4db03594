//! Database operations for `monitor_runs` and `monitor_run_targets`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `monitor_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonitorRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub oracle: String,
    pub trigger_source: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub new_reviews: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A row from the `monitor_run_targets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonitorRunTargetRow {
    pub id: i64,
    pub monitor_run_id: i64,
    pub target_address: String,
    pub target_name: String,
    pub status: String,
    /// For failed targets this is the partial count, not an authoritative total.
    pub new_reviews: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// monitor_runs operations
// ---------------------------------------------------------------------------

/// Creates a new monitor run in `queued` status.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_monitor_run(
    pool: &PgPool,
    oracle: &str,
    trigger_source: &str,
) -> Result<MonitorRunRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, MonitorRunRow>(
        "INSERT INTO monitor_runs (public_id, oracle, trigger_source, status) \
         VALUES ($1, $2, $3, 'queued') \
         RETURNING id, public_id, oracle, trigger_source, status, \
                   started_at, completed_at, new_reviews, error_message, created_at",
    )
    .bind(public_id)
    .bind(oracle)
    .bind(trigger_source)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a run as `running` and sets `started_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `queued`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn start_monitor_run(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE monitor_runs \
         SET status = 'running', started_at = NOW() \
         WHERE id = $1 AND status = 'queued'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "queued",
        });
    }

    Ok(())
}

/// Marks a run as `succeeded` and stores the total new-review count.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn complete_monitor_run(
    pool: &PgPool,
    id: i64,
    new_reviews: i32,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE monitor_runs \
         SET status = 'succeeded', completed_at = NOW(), new_reviews = $1 \
         WHERE id = $2 AND status = 'running'",
    )
    .bind(new_reviews)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run as `failed` with an error message.
///
/// A run that never started may fail straight from `queued`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is already
/// finished, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_monitor_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE monitor_runs \
         SET status = 'failed', completed_at = NOW(), error_message = $1 \
         WHERE id = $2 AND status IN ('queued', 'running')",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "queued or running",
        });
    }

    Ok(())
}

/// Fetches a single run by its internal `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn get_monitor_run(pool: &PgPool, id: i64) -> Result<MonitorRunRow, DbError> {
    sqlx::query_as::<_, MonitorRunRow>(
        "SELECT id, public_id, oracle, trigger_source, status, \
                started_at, completed_at, new_reviews, error_message, created_at \
         FROM monitor_runs \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

// ---------------------------------------------------------------------------
// monitor_run_targets operations
// ---------------------------------------------------------------------------

/// Inserts or updates the per-target result row for a monitor run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_monitor_run_target(
    pool: &PgPool,
    run_id: i64,
    target_name: &str,
    target_address: &str,
    status: &str,
    new_reviews: i32,
    error_message: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO monitor_run_targets \
             (monitor_run_id, target_name, target_address, status, new_reviews, error_message) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (monitor_run_id, target_address) DO UPDATE SET \
             target_name   = EXCLUDED.target_name, \
             status        = EXCLUDED.status, \
             new_reviews   = EXCLUDED.new_reviews, \
             error_message = EXCLUDED.error_message",
    )
    .bind(run_id)
    .bind(target_name)
    .bind(target_address)
    .bind(status)
    .bind(new_reviews)
    .bind(error_message)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns the per-target rows of a run in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_monitor_run_targets(
    pool: &PgPool,
    run_id: i64,
) -> Result<Vec<MonitorRunTargetRow>, DbError> {
    let rows = sqlx::query_as::<_, MonitorRunTargetRow>(
        "SELECT id, monitor_run_id, target_address, target_name, status, new_reviews, \
                error_message, created_at \
         FROM monitor_run_targets \
         WHERE monitor_run_id = $1 \
         ORDER BY id",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
