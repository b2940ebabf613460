//! Test: Observer Fan-out - notifications tied to transitions

use crate::helpers::*;
use pipeline::core::{EventKind, SharedObserver, Stage, TransitionOutcome, Trigger};
use std::sync::Arc;

/// One notification per successful transition, carrying the entered state
#[test]
fn test_one_notification_per_transition() {
    let mut pipeline = new_pipeline();
    let recorder = Arc::new(RecordingObserver::new());
    pipeline.subscribe(recorder.clone());

    pipeline.request_transition(Trigger::ToBuild).unwrap();
    pipeline.request_transition(Trigger::ToTest).unwrap();
    pipeline.request_transition(Trigger::ToAnalyze).unwrap();
    pipeline.request_transition(Trigger::ToPackage).unwrap();
    pipeline.request_transition(Trigger::ToDeploy).unwrap();

    let seen = recorder.seen();
    let stages: Vec<_> = seen.iter().map(|s| s.stage).collect();
    assert_eq!(
        stages,
        vec![Stage::Build, Stage::Test, Stage::Analyze, Stage::Package, Stage::Deploy]
    );
    assert_eq!(seen[4].message, "Pipeline executing deployment");
    assert!(seen.iter().all(|s| s.kind == EventKind::Entered));
}

/// Rejected triggers notify nobody
#[test]
fn test_illegal_trigger_is_silent() {
    let mut pipeline = new_pipeline();
    let recorder = Arc::new(RecordingObserver::new());
    pipeline.subscribe(recorder.clone());

    assert!(pipeline.request_transition(Trigger::ToDeploy).is_err());
    assert_eq!(recorder.count(), 0);
}

/// After unsubscribing, an observer hears nothing more
#[test]
fn test_unsubscribe_stops_notifications() {
    let mut pipeline = new_pipeline();
    let recorder = Arc::new(RecordingObserver::new());
    let handle: SharedObserver = recorder.clone();
    pipeline.subscribe(handle.clone());

    pipeline.advance().unwrap();
    assert!(pipeline.unsubscribe(&handle));
    assert!(!pipeline.unsubscribe(&handle));
    pipeline.advance().unwrap();
    pipeline.cancel().unwrap();

    assert_eq!(recorder.count(), 1);
}

/// A duplicate subscription is notified twice
#[test]
fn test_duplicate_subscription_receives_twice() {
    let mut pipeline = new_pipeline();
    let recorder = Arc::new(RecordingObserver::new());
    pipeline.subscribe(recorder.clone());
    pipeline.subscribe(recorder.clone());

    pipeline.advance().unwrap();
    assert_eq!(recorder.count(), 2);
}

/// Cancellation is announced like any other state entry
#[test]
fn test_cancellation_is_announced() {
    let mut pipeline = pipeline_at(Stage::Test);
    let recorder = Arc::new(RecordingObserver::new());
    pipeline.subscribe(recorder.clone());

    pipeline.cancel().unwrap();

    let seen = recorder.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].stage, Stage::Cancelled);
    assert_eq!(seen[0].message, "Pipeline cancelled");
}

/// A failure while entering Cancelled is reported, not raised
#[test]
fn test_cancellation_failure_is_downgraded_to_notification() {
    let mut pipeline = pipeline_at(Stage::Package);
    let recorder = Arc::new(RecordingObserver::new());
    pipeline.subscribe(Arc::new(RejectingObserver(Stage::Cancelled)));
    pipeline.subscribe(recorder.clone());
    let before = pipeline.state().id();

    let outcome = pipeline.cancel().unwrap();

    let error = match outcome {
        TransitionOutcome::CancellationReported { from, error } => {
            assert_eq!(from, Stage::Package);
            error
        }
        other => panic!("expected a reported cancellation, got {:?}", other),
    };
    assert!(error.reason.contains("Cancelled not allowed"));
    assert_eq!(pipeline.stage(), Stage::Package);
    assert_eq!(pipeline.state().id(), before);

    // The refusal is the only thing observers hear
    let seen = recorder.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, EventKind::CancellationFailed);
    assert_eq!(seen[0].stage, Stage::Package);
    assert_eq!(seen[0].message, error.to_string());
    assert!(seen.iter().all(|s| s.stage != Stage::Cancelled));
}

/// Observer failures never block a forward move
#[test]
fn test_forward_move_ignores_observer_failure() {
    let mut pipeline = new_pipeline();
    pipeline.subscribe(Arc::new(RejectingObserver(Stage::Build)));

    let outcome = pipeline.request_transition(Trigger::ToBuild).unwrap();
    assert_eq!(outcome, TransitionOutcome::Advanced { from: Stage::Source, to: Stage::Build });
}
