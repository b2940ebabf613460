//! Visitor that aggregates the action tree into a report

use crate::core::{ActionCategory, ActionNode, PipelineVisitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One visited action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub id: Uuid,
    pub name: String,
    pub category: ActionCategory,
    /// What [`ActionNode::execute`] returned
    pub description: String,
}

/// Everything a [`ReportVisitor`] has seen, in visiting order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub entries: Vec<ReportEntry>,
    pub counts: BTreeMap<ActionCategory, usize>,
}

impl ExecutionReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of visited actions of one category
    pub fn count(&self, category: ActionCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Entries of one category, in visiting order
    pub fn entries_for(&self, category: ActionCategory) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.category == category)
    }
}

/// Collects an [`ExecutionReport`]
///
/// Reusable: further traversals append to the same report.
#[derive(Debug, Default)]
pub struct ReportVisitor {
    report: ExecutionReport,
}

impl ReportVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &ExecutionReport {
        &self.report
    }

    pub fn into_report(self) -> ExecutionReport {
        self.report
    }

    fn record(&mut self, category: ActionCategory, node: &ActionNode) {
        *self.report.counts.entry(category).or_insert(0) += 1;
        self.report.entries.push(ReportEntry {
            id: node.id(),
            name: node.name().to_string(),
            category,
            description: node.execute(),
        });
    }
}

impl PipelineVisitor for ReportVisitor {
    fn visit_source(&mut self, node: &ActionNode) {
        self.record(ActionCategory::Source, node);
    }

    fn visit_build(&mut self, node: &ActionNode) {
        self.record(ActionCategory::Build, node);
    }

    fn visit_test(&mut self, node: &ActionNode) {
        self.record(ActionCategory::Test, node);
    }

    fn visit_analyze(&mut self, node: &ActionNode) {
        self.record(ActionCategory::Analyze, node);
    }

    fn visit_package(&mut self, node: &ActionNode) {
        self.record(ActionCategory::Package, node);
    }

    fn visit_deploy(&mut self, node: &ActionNode) {
        self.record(ActionCategory::Deploy, node);
    }
}
