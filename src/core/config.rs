//! Pipeline configuration from YAML

use crate::core::{
    action::{ActionCategory, ActionNode},
    pipeline::{Owner, Pipeline},
    stage::Trigger,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Pipeline version (optional)
    #[serde(default)]
    pub version: Option<String>,

    /// Identity of the product owner
    pub product_owner: String,

    /// Identity of the scrum master
    pub scrum_master: String,

    /// Root actions of the action tree
    #[serde(default)]
    pub actions: Vec<ActionConfig>,

    /// Triggers to fire, in order, when the pipeline is run
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

/// Action configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Action name
    pub name: String,

    /// Category deciding which visitor handler runs
    pub category: ActionCategory,

    /// Tool label, e.g. "Github"
    #[serde(default)]
    pub tool: Option<String>,

    /// Nested sub-actions
    #[serde(default)]
    pub children: Vec<ActionConfig>,
}

impl ActionConfig {
    /// Build the action subtree
    pub fn to_node(&self) -> ActionNode {
        let mut node = ActionNode::new(&self.name, self.category);
        if let Some(tool) = &self.tool {
            node = node.with_tool(tool);
        }
        for child in &self.children {
            node.add_child(child.to_node());
        }
        node
    }

    fn validate(&self, path: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Action at '{}' has an empty name", path);
        }

        let here = format!("{}/{}", path, self.name);
        check_unique_names(&self.children, &here)?;
        for child in &self.children {
            child.validate(&here)?;
        }
        Ok(())
    }
}

fn check_unique_names(actions: &[ActionConfig], path: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for action in actions {
        if !seen.insert(action.name.as_str()) {
            anyhow::bail!("Duplicate action name '{}' under '{}'", action.name, path);
        }
    }
    Ok(())
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Pipeline name must not be empty");
        }
        if self.product_owner.trim().is_empty() {
            anyhow::bail!("Pipeline '{}' has no product owner", self.name);
        }
        if self.scrum_master.trim().is_empty() {
            anyhow::bail!("Pipeline '{}' has no scrum master", self.name);
        }

        check_unique_names(&self.actions, "")?;
        for action in &self.actions {
            action.validate("")?;
        }

        Ok(())
    }

    /// Total number of configured actions, nested ones included
    pub fn action_count(&self) -> usize {
        fn count(actions: &[ActionConfig]) -> usize {
            actions.iter().map(|a| 1 + count(&a.children)).sum()
        }
        count(&self.actions)
    }

    /// Convert to a pipeline in the Source stage
    pub fn to_pipeline(&self) -> Pipeline {
        let mut pipeline = Pipeline::new(
            &self.name,
            Owner::new(&self.product_owner),
            Owner::new(&self.scrum_master),
        );
        for action in &self.actions {
            pipeline.add_action(action.to_node());
        }
        pipeline
    }
}
