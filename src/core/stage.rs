//! Workflow stages, transition triggers and the transition table

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A stage of the CI/CD workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Source,
    Build,
    Test,
    Analyze,
    Package,
    Deploy,
    /// Absorbing terminal state
    Cancelled,
}

impl Stage {
    /// The forward order every pipeline walks through
    pub const ORDER: [Stage; 6] = [
        Stage::Source,
        Stage::Build,
        Stage::Test,
        Stage::Analyze,
        Stage::Package,
        Stage::Deploy,
    ];

    /// Immediate successor in the forward order, if any
    pub fn successor(self) -> Option<Stage> {
        match self {
            Stage::Source => Some(Stage::Build),
            Stage::Build => Some(Stage::Test),
            Stage::Test => Some(Stage::Analyze),
            Stage::Analyze => Some(Stage::Package),
            Stage::Package => Some(Stage::Deploy),
            Stage::Deploy | Stage::Cancelled => None,
        }
    }

    /// The one trigger that advances this stage, if any
    pub fn forward_trigger(self) -> Option<Trigger> {
        self.successor().map(Trigger::for_stage)
    }

    /// Whether no transition at all leaves this stage
    pub fn is_terminal(self) -> bool {
        self == Stage::Cancelled
    }

    /// Display name of the stage
    pub fn label(self) -> &'static str {
        match self {
            Stage::Source => "Source Stage",
            Stage::Build => "Build Stage",
            Stage::Test => "Test Stage",
            Stage::Analyze => "Analyze Stage",
            Stage::Package => "Package Stage",
            Stage::Deploy => "Deploy Stage",
            Stage::Cancelled => "Cancelled",
        }
    }

    /// Short description of what the stage is doing
    pub fn action(self) -> &'static str {
        match self {
            Stage::Source => "Fetching sources...",
            Stage::Build => "Building...",
            Stage::Test => "Testing...",
            Stage::Analyze => "Analyzing...",
            Stage::Package => "Packaging...",
            Stage::Deploy => "Deploying...",
            Stage::Cancelled => "Cancelled",
        }
    }

    /// Message broadcast when the stage is entered
    pub fn entry_message(self) -> &'static str {
        match self {
            Stage::Source => "Pipeline fetching sources",
            Stage::Build => "Pipeline executing build",
            Stage::Test => "Pipeline executing tests",
            Stage::Analyze => "Pipeline executing analysis",
            Stage::Package => "Pipeline executing packaging",
            Stage::Deploy => "Pipeline executing deployment",
            Stage::Cancelled => "Pipeline cancelled",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Source => "Source",
            Stage::Build => "Build",
            Stage::Test => "Test",
            Stage::Analyze => "Analyze",
            Stage::Package => "Package",
            Stage::Deploy => "Deploy",
            Stage::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// A request to move the pipeline toward a target stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    #[serde(alias = "source")]
    ToSource,
    #[serde(alias = "build")]
    ToBuild,
    #[serde(alias = "test")]
    ToTest,
    #[serde(alias = "analyze")]
    ToAnalyze,
    #[serde(alias = "package")]
    ToPackage,
    #[serde(alias = "deploy")]
    ToDeploy,
    #[serde(alias = "cancelled", alias = "cancel")]
    ToCancelled,
}

impl Trigger {
    /// Every trigger, in stage order
    pub const ALL: [Trigger; 7] = [
        Trigger::ToSource,
        Trigger::ToBuild,
        Trigger::ToTest,
        Trigger::ToAnalyze,
        Trigger::ToPackage,
        Trigger::ToDeploy,
        Trigger::ToCancelled,
    ];

    /// Trigger targeting the given stage
    pub fn for_stage(stage: Stage) -> Trigger {
        match stage {
            Stage::Source => Trigger::ToSource,
            Stage::Build => Trigger::ToBuild,
            Stage::Test => Trigger::ToTest,
            Stage::Analyze => Trigger::ToAnalyze,
            Stage::Package => Trigger::ToPackage,
            Stage::Deploy => Trigger::ToDeploy,
            Stage::Cancelled => Trigger::ToCancelled,
        }
    }

    /// Stage this trigger asks for
    pub fn target(self) -> Stage {
        match self {
            Trigger::ToSource => Stage::Source,
            Trigger::ToBuild => Stage::Build,
            Trigger::ToTest => Stage::Test,
            Trigger::ToAnalyze => Stage::Analyze,
            Trigger::ToPackage => Stage::Package,
            Trigger::ToDeploy => Stage::Deploy,
            Trigger::ToCancelled => Stage::Cancelled,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "To{}", self.target())
    }
}

/// Raised when a trigger is not legal from the current stage
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Cannot change to {target} State from {from} State")]
pub struct TransitionError {
    /// Stage the pipeline was in
    pub from: Stage,
    /// Stage the trigger asked for
    pub target: Stage,
}

/// What the transition table decided for a `(stage, trigger)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Move to the next stage in the forward order
    Advance(Stage),
    /// Abandon the workflow
    Cancel,
}

/// Look up `(stage, trigger)` in the transition table
pub fn resolve(stage: Stage, trigger: Trigger) -> Result<Resolution, TransitionError> {
    let illegal = TransitionError {
        from: stage,
        target: trigger.target(),
    };

    match (stage, trigger) {
        (Stage::Cancelled, _) => Err(illegal),
        (_, Trigger::ToCancelled) => Ok(Resolution::Cancel),
        (from, trigger) if from.forward_trigger() == Some(trigger) => {
            Ok(Resolution::Advance(trigger.target()))
        }
        _ => Err(illegal),
    }
}
