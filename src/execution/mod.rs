//! Processing of the action tree

pub mod logging;
pub mod report;

pub use logging::LoggingVisitor;
pub use report::{ExecutionReport, ReportEntry, ReportVisitor};
