//! Tests for concurrent schedule retrieval.
//!
//! Uses an in-memory `ScheduleSource` that fails for any identifier starting with `"bad"`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use chrono::{Duration, TimeZone, Utc};
use oncall_engine::{
    fetch_all, fetch_all_strict, EngineError, FetchOutcome, PersonRef, RawEntry, RetrievalFailure,
    ScheduleData, ScheduleSource, TimeWindow,
};
use tokio::sync::Barrier;

struct FakeSource {
    calls: AtomicUsize,
    barrier: Option<Barrier>,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            barrier: None,
        }
    }

    /// Every fetch waits until `n` fetches are in flight at once.
    fn rendezvous(n: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            barrier: Some(Barrier::new(n)),
        }
    }
}

impl ScheduleSource for FakeSource {
    type Error = String;

    async fn fetch_schedule(&self, id: &str, window: &TimeWindow) -> Result<ScheduleData, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        if id.starts_with("bad") {
            return Err("404 Not Found".to_string());
        }

        Ok(ScheduleData {
            id: id.to_string(),
            name: Some(format!("Schedule {id}")),
            entries: vec![RawEntry {
                start: window.since().to_rfc3339(),
                end: window.until().to_rfc3339(),
                user: PersonRef::new("U1", "Alice"),
            }],
        })
    }
}

fn window() -> TimeWindow {
    let since = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    TimeWindow::new(since, since + Duration::days(14)).unwrap()
}

#[tokio::test]
async fn all_succeeding_returns_every_schedule_and_no_failures() {
    let source = FakeSource::new();

    let outcome = fetch_all(&source, &["P1", "P2", "P3"], &window())
        .await
        .unwrap();

    assert_eq!(outcome.schedules.len(), 3);
    assert!(outcome.failures.is_empty());
    assert!(!outcome.is_partial());
}

#[tokio::test]
async fn all_failing_is_an_error_naming_every_identifier() {
    let source = FakeSource::new();
    let ids = ["bad1", "bad2", "bad3"];

    let err = fetch_all(&source, &ids, &window()).await.unwrap_err();

    let message = err.to_string();
    for id in ids {
        assert!(message.contains(id), "{message:?} should mention {id}");
    }
    assert_eq!(message.matches("; ").count(), 2, "joined with \"; \"");

    match err {
        EngineError::FetchFailed { failures } => assert_eq!(failures.len(), 3),
        other => panic!("expected FetchFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn partial_failure_surfaces_results_and_failures() {
    let source = FakeSource::new();

    let outcome = fetch_all(&source, &["P1", "bad", "P2"], &window())
        .await
        .unwrap();

    assert_eq!(outcome.schedules.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].schedule_id, "bad");
    assert_eq!(outcome.failures[0].to_string(), "bad: 404 Not Found");
    assert!(outcome.is_partial());
}

#[tokio::test]
async fn results_keep_identifier_order() {
    let source = FakeSource::new();

    let outcome = fetch_all(&source, &["P3", "P1", "P2"], &window())
        .await
        .unwrap();

    let ids: Vec<&str> = outcome.schedules.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["P3", "P1", "P2"]);
}

#[tokio::test]
async fn duplicate_identifiers_are_fetched_independently() {
    let source = FakeSource::new();

    let outcome = fetch_all(&source, &["P1", "P1"], &window()).await.unwrap();

    assert_eq!(outcome.schedules.len(), 2);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_identifier_list_is_not_an_error() {
    let source = FakeSource::new();
    let ids: [&str; 0] = [];

    let outcome = fetch_all(&source, &ids, &window()).await.unwrap();

    assert!(outcome.schedules.is_empty());
    assert!(outcome.failures.is_empty());
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fetches_run_concurrently() {
    // Each fetch blocks until all four are waiting; a sequential fetcher would hang here.
    let source = FakeSource::rendezvous(4);
    let ids = vec!["P1".to_string(), "P2".to_string(), "bad".to_string(), "P3".to_string()];

    let outcome = tokio::time::timeout(StdDuration::from_secs(5), fetch_all(&source, &ids, &window()))
        .await
        .expect("fetches should not wait on each other")
        .unwrap();

    assert_eq!(outcome.schedules.len(), 3);
    assert_eq!(outcome.failures.len(), 1);
}

#[tokio::test]
async fn a_failure_does_not_cancel_siblings() {
    let source = FakeSource::new();

    let outcome = fetch_all(&source, &["bad1", "P1", "bad2", "P2"], &window())
        .await
        .unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    assert_eq!(outcome.schedules.len(), 2);
    assert_eq!(outcome.failures.len(), 2);
}

#[tokio::test]
async fn strict_fetch_rejects_partial_results() {
    let source = FakeSource::new();

    let err = fetch_all_strict(&source, &["P1", "bad"], &window())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "bad: 404 Not Found");
}

#[tokio::test]
async fn strict_fetch_returns_schedules_when_all_succeed() {
    let source = FakeSource::new();

    let schedules = fetch_all_strict(&source, &["P1", "P2"], &window())
        .await
        .unwrap();

    let by_id: HashMap<&str, &ScheduleData> =
        schedules.iter().map(|s| (s.id.as_str(), s)).collect();
    assert_eq!(by_id.len(), 2);
    assert_eq!(by_id["P2"].name.as_deref(), Some("Schedule P2"));
}

#[test]
fn outcome_is_partial_only_with_both_schedules_and_failures() {
    let failure = RetrievalFailure {
        schedule_id: "bad".to_string(),
        message: "404 Not Found".to_string(),
    };
    let schedule = ScheduleData {
        id: "P1".to_string(),
        ..ScheduleData::default()
    };

    let complete = FetchOutcome {
        schedules: vec![schedule.clone()],
        failures: Vec::new(),
    };
    let partial = FetchOutcome {
        schedules: vec![schedule],
        failures: vec![failure.clone()],
    };
    let nothing = FetchOutcome {
        schedules: Vec::new(),
        failures: vec![failure],
    };

    assert!(!complete.is_partial());
    assert!(partial.is_partial());
    assert!(!nothing.is_partial(), "all-failed is not partial");
}
