//! Visitor that logs each action as it is reached

use crate::core::{ActionNode, PipelineVisitor};
use tracing::info;

/// Writes one log line per visited action
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingVisitor {
    visited: usize,
}

impl LoggingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions logged so far
    pub fn visited(&self) -> usize {
        self.visited
    }

    fn log(&mut self, stage: &str, node: &ActionNode) {
        self.visited += 1;
        info!("[{}] {}: {}", stage, node.name(), node.execute());
    }
}

impl PipelineVisitor for LoggingVisitor {
    fn visit_source(&mut self, node: &ActionNode) {
        self.log("source", node);
    }

    fn visit_build(&mut self, node: &ActionNode) {
        self.log("build", node);
    }

    fn visit_test(&mut self, node: &ActionNode) {
        self.log("test", node);
    }

    fn visit_analyze(&mut self, node: &ActionNode) {
        self.log("analyze", node);
    }

    fn visit_package(&mut self, node: &ActionNode) {
        self.log("package", node);
    }

    fn visit_deploy(&mut self, node: &ActionNode) {
        self.log("deploy", node);
    }
}
