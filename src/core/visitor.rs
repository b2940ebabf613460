//! Visitor over the action tree

use crate::core::action::ActionNode;

/// A processor with one handler per action category
///
/// Nodes pick the handler themselves (see [`ActionNode::dispatch`]), so a
/// visitor never inspects categories. Handlers must not abort: a traversal
/// that stops halfway leaves the forest partly visited.
pub trait PipelineVisitor {
    fn visit_source(&mut self, node: &ActionNode);
    fn visit_build(&mut self, node: &ActionNode);
    fn visit_test(&mut self, node: &ActionNode);
    fn visit_analyze(&mut self, node: &ActionNode);
    fn visit_package(&mut self, node: &ActionNode);
    fn visit_deploy(&mut self, node: &ActionNode);
}
