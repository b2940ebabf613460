//! Test: Full Lifecycle - a configured pipeline from Source to Cancelled

use crate::helpers::*;
use pipeline::core::config::PipelineConfig;
use pipeline::core::{EventLog, SharedPipeline, Stage, TransitionOutcome, Trigger};
use std::sync::Arc;

/// Skipping ahead fails, the forward walk succeeds, Deploy can be cancelled
#[test]
fn test_source_to_deploy_then_cancel() {
    let mut pipeline = new_pipeline();
    let recorder = Arc::new(RecordingObserver::new());
    pipeline.subscribe(recorder.clone());

    let err = pipeline.request_transition(Trigger::ToDeploy).unwrap_err();
    assert!(err.to_string().contains("Source"));
    assert_eq!(pipeline.stage(), Stage::Source);

    for trigger in [
        Trigger::ToBuild,
        Trigger::ToTest,
        Trigger::ToAnalyze,
        Trigger::ToPackage,
        Trigger::ToDeploy,
    ] {
        let outcome = pipeline.request_transition(trigger).unwrap();
        assert_eq!(pipeline.stage(), trigger.target());
        assert!(matches!(outcome, TransitionOutcome::Advanced { .. }));
    }

    let outcome = pipeline.request_transition(Trigger::ToCancelled).unwrap();
    assert_eq!(outcome, TransitionOutcome::Cancelled { from: Stage::Deploy });
    assert_eq!(pipeline.stage(), Stage::Cancelled);
    assert_eq!(recorder.count(), 6);
}

/// A pipeline loaded from YAML runs its configured triggers
#[test]
fn test_configured_pipeline_runs_its_triggers() {
    let yaml = r#"
name: "release-train"
product_owner: "Erdem"
scrum_master: "Luc"
actions:
  - name: "checkout"
    category: source
    tool: "Github"
  - name: "bundle"
    category: package
    tool: "Yarn"
triggers: [build, test, analyze, package]
"#;

    let config = PipelineConfig::from_yaml(yaml).unwrap();
    let mut pipeline = config.to_pipeline();
    let log = Arc::new(EventLog::new());
    pipeline.subscribe(log.clone());

    for trigger in &config.triggers {
        pipeline.request_transition(*trigger).unwrap();
    }

    assert_eq!(pipeline.stage(), Stage::Package);
    let bundle: Vec<_> = pipeline.actions_for(Stage::Package).collect();
    assert_eq!(bundle.len(), 1);
    assert_eq!(bundle[0].execute(), "Executing Yarn Package Action");

    let notifications = log.notifications();
    assert_eq!(notifications.len(), 4);
    assert_eq!(notifications[3].state_id, pipeline.state().id());
}

/// A shared handle serialises requests coming from several threads
#[test]
fn test_shared_pipeline_walks_forward_once() {
    let shared = SharedPipeline::new(new_pipeline());
    let recorder = Arc::new(RecordingObserver::new());
    shared.subscribe(recorder.clone());

    let threads: Vec<_> = Stage::ORDER[1..]
        .iter()
        .map(|_| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                // Each thread advances whatever stage it finds
                shared.with_pipeline(|p| p.advance().is_ok())
            })
        })
        .collect();

    for thread in threads {
        assert!(thread.join().unwrap());
    }

    assert_eq!(shared.stage(), Stage::Deploy);
    assert_eq!(recorder.count(), 5);
}
