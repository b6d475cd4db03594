//! Fault-isolation tests for `RunLoop::run_all`.

mod common;

use std::time::Duration;

use common::{reviews, CollectingSink, MemoryOracle, Script, ScriptedFeed};
use revmon_core::{FailureKind, Target, TargetOutcome};
use revmon_monitor::{IncrementalMonitor, RunLoop, TracingSink};

fn monitor() -> IncrementalMonitor {
    IncrementalMonitor::new(Duration::from_secs(5), 50)
}

fn three_targets() -> Vec<Target> {
    vec![
        Target::new("First", "https://a"),
        Target::new("Second", "https://b"),
        Target::new("", "https://c"),
    ]
}

#[tokio::test]
async fn failing_target_does_not_stop_the_others() {
    let feed = ScriptedFeed::default()
        .with("https://a", Script::pages(vec![reviews("a", 3)]))
        .with(
            "https://b",
            Script {
                fail_at_offset: Some(0),
                ..Script::pages(vec![reviews("b", 2)])
            },
        )
        .with("https://c", Script::pages(vec![reviews("c", 5)]));
    let oracle = MemoryOracle::knowing(&["c-2"]);
    let run_loop = RunLoop::new(monitor(), feed, oracle);
    let sink = CollectingSink::default();

    let summaries = run_loop.run_all(&three_targets(), &sink).await;

    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[0].target.address, "https://a");
    assert_eq!(summaries[0].new_review_count(), Some(3));
    assert_eq!(summaries[1].target.address, "https://b");
    assert!(matches!(
        summaries[1].outcome,
        TargetOutcome::Failed {
            kind: FailureKind::FeedFetch,
            partial_count: 0,
            ..
        }
    ));
    assert_eq!(summaries[2].target.address, "https://c");
    assert_eq!(summaries[2].new_review_count(), Some(2));

    assert_eq!(*sink.summaries.lock().unwrap(), summaries);
}

#[tokio::test]
async fn sort_failure_is_recorded_and_run_continues() {
    let feed = ScriptedFeed::default()
        .with(
            "https://a",
            Script {
                sort_status: -1,
                ..Script::default()
            },
        )
        .with("https://b", Script::pages(vec![reviews("b", 1)]));
    let run_loop = RunLoop::new(monitor(), feed, MemoryOracle::default());
    let targets = vec![Target::new("", "https://a"), Target::new("", "https://b")];

    let summaries = run_loop.run_all(&targets, &TracingSink).await;

    match &summaries[0].outcome {
        TargetOutcome::Failed { kind, reason, .. } => {
            assert_eq!(*kind, FailureKind::FeedSort);
            assert!(reason.contains("status -1"), "reason was: {reason}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(summaries[1].new_review_count(), Some(1));
}

#[tokio::test]
async fn oracle_failure_reports_partial_count_as_failed() {
    let feed = ScriptedFeed::default().with("https://a", Script::pages(vec![reviews("a", 4)]));
    let run_loop = RunLoop::new(monitor(), feed, MemoryOracle::failing_on("a-1"));

    let summaries = run_loop
        .run_all(&[Target::new("", "https://a")], &TracingSink)
        .await;

    assert_eq!(summaries[0].new_review_count(), None);
    assert!(matches!(
        summaries[0].outcome,
        TargetOutcome::Failed {
            kind: FailureKind::Oracle,
            partial_count: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn no_targets_yields_no_summaries() {
    let run_loop = RunLoop::new(monitor(), ScriptedFeed::default(), MemoryOracle::default());
    let summaries = run_loop.run_all(&[], &TracingSink).await;
    assert!(summaries.is_empty());
}

#[tokio::test]
async fn rerun_is_idempotent_across_targets() {
    let feed = ScriptedFeed::default()
        .with("https://a", Script::pages(vec![reviews("a", 2)]))
        .with("https://b", Script::pages(vec![reviews("b", 3)]));
    let run_loop = RunLoop::new(monitor(), feed, MemoryOracle::default());
    let targets = vec![Target::new("", "https://a"), Target::new("", "https://b")];

    let first = run_loop.run_all(&targets, &TracingSink).await;
    let second = run_loop.run_all(&targets, &TracingSink).await;

    let counts = |s: &[revmon_core::RunSummary]| {
        s.iter()
            .map(revmon_core::RunSummary::new_review_count)
            .collect::<Vec<_>>()
    };
    assert_eq!(counts(&first), vec![Some(2), Some(3)]);
    assert_eq!(counts(&second), vec![Some(0), Some(0)]);
    assert_eq!(run_loop.oracle().recorded.lock().unwrap().len(), 5);
}
