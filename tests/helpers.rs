//! Test utility functions for pipeline scenarios

#![allow(dead_code)]

use pipeline::core::{
    ActionNode, EventKind, Observer, ObserverError, Owner, Pipeline, PipelineState,
    PipelineVisitor, Stage, StateEvent,
};
use std::sync::Mutex;

/// What a recording observer saw for one notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub stage: Stage,
    pub kind: EventKind,
    pub message: String,
}

/// Observer that remembers every notification
#[derive(Debug, Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<Seen>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Observer for RecordingObserver {
    fn name(&self) -> &str {
        "recording"
    }

    fn receive(&self, event: &StateEvent<'_>) -> Result<(), ObserverError> {
        self.seen.lock().unwrap().push(Seen {
            stage: event.state.stage(),
            kind: event.kind,
            message: event.message.clone(),
        });
        Ok(())
    }
}

/// Observer that refuses notifications from one stage
///
/// Set to Cancelled, it also refuses every cancellation.
pub struct RejectingObserver(pub Stage);

impl Observer for RejectingObserver {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn receive(&self, event: &StateEvent<'_>) -> Result<(), ObserverError> {
        if event.state.stage() == self.0 {
            Err(ObserverError::new(self.name(), format!("{} not allowed", self.0)))
        } else {
            Ok(())
        }
    }

    fn approve_cancellation(&self, _state: &PipelineState) -> Result<(), ObserverError> {
        if self.0 == Stage::Cancelled {
            Err(ObserverError::new(self.name(), format!("{} not allowed", self.0)))
        } else {
            Ok(())
        }
    }
}

/// Visitor that records `category:name` in visiting order
#[derive(Debug, Default)]
pub struct OrderVisitor(pub Vec<String>);

impl OrderVisitor {
    fn push(&mut self, category: &str, node: &ActionNode) {
        self.0.push(format!("{}:{}", category, node.name()));
    }
}

impl PipelineVisitor for OrderVisitor {
    fn visit_source(&mut self, node: &ActionNode) {
        self.push("source", node);
    }
    fn visit_build(&mut self, node: &ActionNode) {
        self.push("build", node);
    }
    fn visit_test(&mut self, node: &ActionNode) {
        self.push("test", node);
    }
    fn visit_analyze(&mut self, node: &ActionNode) {
        self.push("analyze", node);
    }
    fn visit_package(&mut self, node: &ActionNode) {
        self.push("package", node);
    }
    fn visit_deploy(&mut self, node: &ActionNode) {
        self.push("deploy", node);
    }
}

/// A fresh pipeline in Source
pub fn new_pipeline() -> Pipeline {
    Pipeline::new("pipelineTest", Owner::new("Erdem"), Owner::new("Luc"))
}

/// A pipeline moved forward (or cancelled) until it sits in `stage`
pub fn pipeline_at(stage: Stage) -> Pipeline {
    let mut pipeline = new_pipeline();
    if stage == Stage::Cancelled {
        pipeline.cancel().unwrap();
        return pipeline;
    }
    while pipeline.stage() != stage {
        pipeline.advance().unwrap();
    }
    pipeline
}

/// Every stage a pipeline can be in
pub const ALL_STAGES: [Stage; 7] = [
    Stage::Source,
    Stage::Build,
    Stage::Test,
    Stage::Analyze,
    Stage::Package,
    Stage::Deploy,
    Stage::Cancelled,
];
