//! CLI command definitions

use crate::core::Trigger;
use clap::Args;

/// Walk a pipeline through its triggers
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Triggers to fire instead of the ones in the file
    #[arg(long, value_enum)]
    pub trigger: Vec<Trigger>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl RunCommand {
    /// Triggers from the command line, falling back to the configured ones
    pub fn effective_triggers(&self, configured: &[Trigger]) -> Vec<Trigger> {
        if self.trigger.is_empty() {
            configured.to_vec()
        } else {
            self.trigger.clone()
        }
    }
}

/// Validate a pipeline configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show the action tree of a pipeline
#[derive(Debug, Args, Clone)]
pub struct TreeCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
