//! Live integration tests for revmon-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. They need `DATABASE_URL` pointing at a server the
//! harness may create databases on, so they are ignored by default:
//! `cargo test -p revmon-db -- --ignored`.

use chrono::{TimeZone, Utc};
use revmon_core::Review;
use revmon_db::{
    complete_monitor_run, create_monitor_run, fail_monitor_run, get_monitor_run, get_review,
    insert_review_if_absent, list_monitor_run_targets, ping, review_exists, start_monitor_run,
    upsert_monitor_run_target, DbError,
};

fn make_review(id: &str) -> Review {
    Review {
        id: id.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap(),
        text: Some("Friendly staff".to_string()),
        author: Some("Lee".to_string()),
        rating: Some(4.0),
        target_name: "Cafe Roma".to_string(),
        target_address: "https://maps.example/roma".to_string(),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn insert_review_if_absent_is_idempotent(pool: sqlx::PgPool) {
    let review = make_review("rev-1");

    assert!(!review_exists(&pool, "rev-1").await.unwrap());
    assert!(insert_review_if_absent(&pool, &review).await.unwrap());
    assert!(!insert_review_if_absent(&pool, &review).await.unwrap());
    assert!(review_exists(&pool, "rev-1").await.unwrap());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn get_review_round_trips_payload(pool: sqlx::PgPool) {
    let review = make_review("rev-2");
    insert_review_if_absent(&pool, &review).await.unwrap();

    let row = get_review(&pool, "rev-2").await.unwrap();
    assert_eq!(row.reviewed_at, review.timestamp);
    assert_eq!(row.body.as_deref(), Some("Friendly staff"));
    assert_eq!(row.target_address, "https://maps.example/roma");

    assert!(matches!(
        get_review(&pool, "missing").await,
        Err(DbError::NotFound)
    ));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn monitor_run_lifecycle_succeeds(pool: sqlx::PgPool) {
    let run = create_monitor_run(&pool, "local", "cli").await.unwrap();
    assert_eq!(run.status, "queued");

    start_monitor_run(&pool, run.id).await.unwrap();
    upsert_monitor_run_target(&pool, run.id, "A", "https://a", "succeeded", 3, None)
        .await
        .unwrap();
    upsert_monitor_run_target(
        &pool,
        run.id,
        "B",
        "https://b",
        "failed",
        1,
        Some("feed fetch failed"),
    )
    .await
    .unwrap();
    complete_monitor_run(&pool, run.id, 3).await.unwrap();

    let stored = get_monitor_run(&pool, run.id).await.unwrap();
    assert_eq!(stored.status, "succeeded");
    assert_eq!(stored.new_reviews, 3);
    assert!(stored.completed_at.is_some());

    let targets = list_monitor_run_targets(&pool, run.id).await.unwrap();
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].target_address, "https://a");
    assert_eq!(targets[1].status, "failed");
    assert_eq!(
        targets[1].error_message.as_deref(),
        Some("feed fetch failed")
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn monitor_run_rejects_invalid_transitions(pool: sqlx::PgPool) {
    let run = create_monitor_run(&pool, "remote", "cli").await.unwrap();

    assert!(matches!(
        complete_monitor_run(&pool, run.id, 0).await,
        Err(DbError::InvalidRunTransition { .. })
    ));

    start_monitor_run(&pool, run.id).await.unwrap();
    fail_monitor_run(&pool, run.id, "all targets failed")
        .await
        .unwrap();

    assert!(matches!(
        start_monitor_run(&pool, run.id).await,
        Err(DbError::InvalidRunTransition { .. })
    ));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn queued_run_can_fail_before_starting(pool: sqlx::PgPool) {
    let run = create_monitor_run(&pool, "local", "cli").await.unwrap();

    fail_monitor_run(&pool, run.id, "could not start")
        .await
        .unwrap();

    let stored = get_monitor_run(&pool, run.id).await.unwrap();
    assert_eq!(stored.status, "failed");
    assert_eq!(stored.error_message.as_deref(), Some("could not start"));
    assert!(matches!(
        fail_monitor_run(&pool, run.id, "again").await,
        Err(DbError::InvalidRunTransition { .. })
    ));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn ping_reaches_migrated_database(pool: sqlx::PgPool) {
    ping(&pool).await.unwrap();
}
