//! Composite action tree

use crate::core::{stage::Stage, visitor::PipelineVisitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of work an action performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Source,
    Build,
    Test,
    Analyze,
    Package,
    Deploy,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 6] = [
        ActionCategory::Source,
        ActionCategory::Build,
        ActionCategory::Test,
        ActionCategory::Analyze,
        ActionCategory::Package,
        ActionCategory::Deploy,
    ];

    /// The stage this category of action conventionally runs in
    pub fn stage(self) -> Stage {
        match self {
            ActionCategory::Source => Stage::Source,
            ActionCategory::Build => Stage::Build,
            ActionCategory::Test => Stage::Test,
            ActionCategory::Analyze => Stage::Analyze,
            ActionCategory::Package => Stage::Package,
            ActionCategory::Deploy => Stage::Deploy,
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.stage(), f)
    }
}

/// A node in a pipeline's action tree
///
/// Children are owned by their parent, so the tree is finite and acyclic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionNode {
    id: Uuid,
    name: String,
    category: ActionCategory,
    /// Tool the action drives, e.g. "Github" or "Yarn"
    tool: Option<String>,
    children: Vec<ActionNode>,
}

impl ActionNode {
    pub fn new(name: impl Into<String>, category: ActionCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            tool: None,
            children: Vec::new(),
        }
    }

    /// Set the tool label used in the execution description
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Builder form of [`ActionNode::add_child`]
    pub fn with_child(mut self, child: ActionNode) -> Self {
        self.add_child(child);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ActionCategory {
        self.category
    }

    pub fn tool(&self) -> Option<&str> {
        self.tool.as_deref()
    }

    pub fn children(&self) -> &[ActionNode] {
        &self.children
    }

    /// Append a child and return its id
    pub fn add_child(&mut self, child: ActionNode) -> Uuid {
        let id = child.id;
        self.children.push(child);
        id
    }

    /// Detach the direct child with `id`. Absent ids are ignored.
    pub fn remove_child(&mut self, id: Uuid) -> Option<ActionNode> {
        let index = self.children.iter().position(|c| c.id == id)?;
        Some(self.children.remove(index))
    }

    /// Find this node or a descendant by id
    pub fn find(&self, id: Uuid) -> Option<&ActionNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ActionNode::size).sum::<usize>()
    }

    /// Describe what running this action does
    pub fn execute(&self) -> String {
        match &self.tool {
            Some(tool) => format!("Executing {} {} Action", tool, self.category),
            None => format!("Executing {} Action", self.category),
        }
    }

    /// Hand this node to the visitor method for its category
    pub fn dispatch<V: PipelineVisitor + ?Sized>(&self, visitor: &mut V) {
        match self.category {
            ActionCategory::Source => visitor.visit_source(self),
            ActionCategory::Build => visitor.visit_build(self),
            ActionCategory::Test => visitor.visit_test(self),
            ActionCategory::Analyze => visitor.visit_analyze(self),
            ActionCategory::Package => visitor.visit_package(self),
            ActionCategory::Deploy => visitor.visit_deploy(self),
        }
    }

    /// Dispatch this node, then each child in order (pre-order)
    pub fn accept_visitor<V: PipelineVisitor + ?Sized>(&self, visitor: &mut V) {
        self.dispatch(visitor);
        for child in &self.children {
            child.accept_visitor(visitor);
        }
    }
}
