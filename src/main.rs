use anyhow::{Context, Result};
use pipeline::cli::commands::{RunCommand, TreeCommand, ValidateCommand};
use pipeline::cli::output::*;
use pipeline::cli::{Cli, Command};
use pipeline::core::config::PipelineConfig;
use pipeline::core::{EventLog, Pipeline, SharedObserver, TransitionError};
use pipeline::execution::{LoggingVisitor, ReportVisitor};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd)?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
        Command::Tree(cmd) => show_tree(cmd)?,
    }

    Ok(())
}

fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let config = PipelineConfig::from_file(&cmd.file)
        .context("Failed to load pipeline config")?;
    let mut pipeline = config.to_pipeline();

    let log = Arc::new(EventLog::new());
    pipeline.subscribe(log.clone());

    if !cmd.json {
        let console: SharedObserver = Arc::new(ConsoleObserver);
        pipeline.subscribe(console);
        println!(
            "{} Loaded pipeline: {} (owner {}, scrum master {})",
            INFO,
            style(pipeline.name()).bold(),
            style(pipeline.product_owner()).cyan(),
            style(pipeline.scrum_master()).cyan()
        );
        run_stage_actions(&pipeline);
    }

    let mut outcomes = Vec::new();
    let mut failure: Option<TransitionError> = None;

    for trigger in cmd.effective_triggers(&config.triggers) {
        match pipeline.request_transition(trigger) {
            Ok(outcome) => {
                if !cmd.json {
                    println!("{}", format_outcome(&outcome));
                    if outcome.changed_state() {
                        run_stage_actions(&pipeline);
                    }
                }
                outcomes.push(outcome);
            }
            Err(e) => {
                if !cmd.json {
                    println!("{}", format_transition_error(&e));
                }
                failure = Some(e);
                break;
            }
        }
    }

    if cmd.json {
        let data = serde_json::json!({
            "name": pipeline.name(),
            "stage": pipeline.stage(),
            "outcomes": outcomes,
            "notifications": log.notifications(),
            "error": failure.as_ref().map(ToString::to_string),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!(
            "\n{} {} finished in {}",
            INFO,
            style(pipeline.name()).bold(),
            format_stage(pipeline.stage())
        );
    }

    if let Some(e) = failure {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Print and log the root actions that belong to the current stage
fn run_stage_actions(pipeline: &Pipeline) {
    let mut visitor = LoggingVisitor::new();
    for action in pipeline.actions_for(pipeline.stage()) {
        println!("   {} {}", ROCKET, style(action.execute()).dim());
        action.accept_visitor(&mut visitor);
    }
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    if !cmd.json {
        println!("{} Validating pipeline...", INFO);
    }

    match PipelineConfig::from_file(&cmd.file) {
        Ok(config) => {
            println!("{}", format_validation(&config, cmd.json)?);
            Ok(())
        }
        Err(e) => {
            if cmd.json {
                let data = serde_json::json!({ "valid": false, "error": format!("{:#}", e) });
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!("{} Validation failed:", CROSS);
                println!("  {}", style(format!("{:#}", e)).red());
            }
            std::process::exit(1);
        }
    }
}

fn show_tree(cmd: &TreeCommand) -> Result<()> {
    let config = PipelineConfig::from_file(&cmd.file)
        .context("Failed to load pipeline config")?;
    let pipeline = config.to_pipeline();

    let mut visitor = ReportVisitor::new();
    pipeline.traverse(&mut visitor);
    let report = visitor.into_report();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if pipeline.actions().is_empty() {
        println!("{} {} has no actions", INFO, style(pipeline.name()).bold());
        return Ok(());
    }

    println!("{}\n", format_tree(pipeline.actions()));
    println!("{}", format_report(&report));
    Ok(())
}
