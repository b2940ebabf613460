//! CLI output formatting

use crate::core::config::PipelineConfig;
use crate::core::{
    ActionNode, EventKind, Observer, ObserverError, Stage, StateEvent, TransitionError,
    TransitionOutcome,
};
use crate::execution::ExecutionReport;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static BELL: Emoji<'_, '_> = Emoji("🔔 ", "* ");

/// Format a stage for display
pub fn format_stage(stage: Stage) -> String {
    let label = stage.to_string().to_uppercase();
    match stage {
        Stage::Source => style(label).dim().to_string(),
        Stage::Build | Stage::Test | Stage::Analyze | Stage::Package => {
            style(label).yellow().to_string()
        }
        Stage::Deploy => style(label).green().to_string(),
        Stage::Cancelled => style(label).red().to_string(),
    }
}

/// Format the result of a transition request
pub fn format_outcome(outcome: &TransitionOutcome) -> String {
    match outcome {
        TransitionOutcome::Advanced { from, to } => format!(
            "{} {} → {}",
            CHECK,
            format_stage(*from),
            format_stage(*to)
        ),
        TransitionOutcome::Cancelled { from } => format!(
            "{} {} → {}",
            WARN,
            format_stage(*from),
            format_stage(Stage::Cancelled)
        ),
        TransitionOutcome::CancellationReported { error, .. } => {
            format!("{} {}", WARN, style(error).yellow())
        }
    }
}

/// Format a rejected transition
pub fn format_transition_error(error: &TransitionError) -> String {
    format!("{} {}", CROSS, style(error).red())
}

/// Format an observer notification
pub fn format_notification(event: &StateEvent<'_>) -> String {
    match event.kind {
        EventKind::Entered => format!(
            "{} {} ({})",
            BELL,
            style(&event.message).cyan(),
            style(event.state.action()).dim()
        ),
        EventKind::CancellationFailed => format!(
            "{} {} [{}]",
            BELL,
            style(&event.message).red(),
            style(event.state.name()).dim()
        ),
    }
}

/// Format an action tree, one indented line per action
pub fn format_tree(actions: &[ActionNode]) -> String {
    fn walk(node: &ActionNode, depth: usize, out: &mut Vec<String>) {
        out.push(format!(
            "{}{} {}",
            "  ".repeat(depth),
            style(node.name()).bold(),
            style(format!("[{}]", node.category())).dim()
        ));
        for child in node.children() {
            walk(child, depth + 1, out);
        }
    }

    let mut lines = Vec::new();
    for action in actions {
        walk(action, 0, &mut lines);
    }
    lines.join("\n")
}

/// Format a traversal report
pub fn format_report(report: &ExecutionReport) -> String {
    let mut lines: Vec<String> = report
        .entries
        .iter()
        .map(|entry| {
            format!("{} {}: {}", ROCKET, style(&entry.name).cyan(), entry.description)
        })
        .collect();

    let counts = report
        .counts
        .iter()
        .map(|(category, count)| format!("{} {}", count, category))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("{} {} action(s): {}", INFO, report.len(), counts));
    lines.join("\n")
}

/// Format a valid configuration, either as a summary or as pure JSON
pub fn format_validation(config: &PipelineConfig, json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(config);
    }

    Ok([
        format!("{} Pipeline configuration is valid!", CHECK),
        format!("  Name: {}", style(&config.name).bold()),
        format!("  Actions: {}", style(config.action_count()).cyan()),
        format!("  Triggers: {}", style(config.triggers.len()).cyan()),
    ]
    .join("\n"))
}

/// Observer that prints every notification to the terminal
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl Observer for ConsoleObserver {
    fn name(&self) -> &str {
        "console"
    }

    fn receive(&self, event: &StateEvent<'_>) -> Result<(), ObserverError> {
        println!("{}", format_notification(event));
        Ok(())
    }
}
