//! pipeline - A CI/CD workflow modelled as a stage state machine

pub mod cli;
pub mod core;
pub mod execution;

// Re-export commonly used types
pub use crate::core::{ActionCategory, ActionNode, PipelineVisitor};
pub use crate::core::{
    EventLog, Observer, ObserverError, ObserverRegistry, SharedObserver, StateEvent,
};
pub use crate::core::{
    Owner, Pipeline, PipelineState, SharedPipeline, Stage, TransitionError, TransitionOutcome,
    Trigger,
};
pub use crate::execution::{ExecutionReport, LoggingVisitor, ReportVisitor};
