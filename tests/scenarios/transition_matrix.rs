//! Test: Transition Matrix - every (stage, trigger) pair

use crate::helpers::*;
use pipeline::core::{Stage, TransitionOutcome, Trigger};

/// Illegal triggers fail and keep the very same state instance
#[test]
fn test_illegal_triggers_leave_state_untouched() {
    for stage in ALL_STAGES {
        for trigger in Trigger::ALL {
            let legal = stage != Stage::Cancelled
                && (trigger == Trigger::ToCancelled || stage.forward_trigger() == Some(trigger));
            if legal {
                continue;
            }

            let mut pipeline = pipeline_at(stage);
            let before = pipeline.state().id();

            let err = pipeline
                .request_transition(trigger)
                .expect_err("trigger should be rejected");

            assert_eq!(err.from, stage);
            assert_eq!(err.target, trigger.target());
            assert!(err.to_string().contains(&format!("from {} State", stage)));
            assert_eq!(pipeline.state().id(), before, "{} on {}", trigger, stage);
            assert_eq!(pipeline.stage(), stage);
        }
    }
}

/// The forward trigger reaches the unique successor
#[test]
fn test_forward_trigger_reaches_successor() {
    for stage in &Stage::ORDER[..5] {
        let mut pipeline = pipeline_at(*stage);
        let before = pipeline.state().id();
        let next = stage.successor().unwrap();

        let outcome = pipeline
            .request_transition(stage.forward_trigger().unwrap())
            .unwrap();

        assert_eq!(outcome, TransitionOutcome::Advanced { from: *stage, to: next });
        assert_eq!(pipeline.stage(), next);
        assert_ne!(pipeline.state().id(), before);
    }
}

/// Deploy has no forward trigger but can still be cancelled
#[test]
fn test_deploy_only_accepts_cancellation() {
    let mut pipeline = pipeline_at(Stage::Deploy);
    for trigger in &Trigger::ALL[..6] {
        assert!(pipeline.request_transition(*trigger).is_err());
    }

    let outcome = pipeline.request_transition(Trigger::ToCancelled).unwrap();
    assert_eq!(outcome, TransitionOutcome::Cancelled { from: Stage::Deploy });
    assert_eq!(pipeline.stage(), Stage::Cancelled);
}

/// Cancelled is absorbing
#[test]
fn test_cancelled_rejects_every_trigger() {
    let mut pipeline = pipeline_at(Stage::Cancelled);
    let before = pipeline.state().id();

    for trigger in Trigger::ALL {
        assert!(pipeline.request_transition(trigger).is_err());
    }
    assert_eq!(pipeline.stage(), Stage::Cancelled);
    assert_eq!(pipeline.state().id(), before);
}
