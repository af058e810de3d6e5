// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod exit_codes;
pub mod gate;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod types;

use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::engine::{Orchestrator, RunResult};
use crate::errors::Result;
use crate::exec::{ProcessRunner, TokioProcessRunner};
use crate::report::{Terminal, make_terminal};
use crate::types::ReporterStyle;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - pipeline loading (config file or built-in defaults)
/// - terminal selection (rich/plain, interactive/fixed policy)
/// - the process runner
/// - the orchestrator
///
/// and returns the process exit status.
pub async fn run(args: CliArgs) -> Result<i32> {
    let config = match &args.config {
        Some(path) => load_and_validate(path)?,
        None => {
            debug!("no --config given; using built-in pipeline");
            ConfigFile::builtin()
        }
    };

    if args.dry_run {
        print_dry_run(&config);
        return Ok(exit_codes::SUCCESS);
    }

    let (settings, gate, steps) = config.into_parts();

    let policy = args.policy().or(settings.non_interactive);
    let style = if args.plain {
        ReporterStyle::Plain
    } else {
        settings.reporter
    };
    info!(?style, ?policy, "terminal selected");

    let terminal = make_terminal(style, policy, settings.next_steps.clone());

    let mut runner = TokioProcessRunner::new();
    if let Some(dir) = &settings.working_dir {
        runner = runner.with_working_dir(dir);
    }

    let mut orchestrator = Orchestrator::new(runner, terminal, settings.orchestrator_options());
    let result = orchestrator.run(&gate, steps).await;

    Ok(conclude(&mut orchestrator, &result))
}

/// Render the final summary and map the run to a process exit status.
///
/// This is the outermost boundary for terminal faults: a summary that fails
/// to render, or earlier progress output that failed, turns an otherwise
/// successful run into [`exit_codes::RUNTIME_ERROR`]. The computed outcome is
/// never altered.
pub fn conclude<R, T>(orchestrator: &mut Orchestrator<R, T>, result: &RunResult) -> i32
where
    R: ProcessRunner,
    T: Terminal,
{
    let mut code = result.exit_code();

    if let RunResult::Completed(outcome) = result {
        if let Err(e) = orchestrator.terminal_mut().summary(outcome) {
            error!(error = %e, "failed to render run summary");
            if code == exit_codes::SUCCESS {
                code = exit_codes::RUNTIME_ERROR;
            }
        }
    }

    if code == exit_codes::SUCCESS && orchestrator.terminal_faults() > 0 {
        error!(
            faults = orchestrator.terminal_faults(),
            "terminal output failed during the run"
        );
        code = exit_codes::RUNTIME_ERROR;
    }

    code
}

/// Simple dry-run output: print prerequisites, steps and settings.
fn print_dry_run(cfg: &ConfigFile) {
    let settings = cfg.settings();

    println!("stepgate dry-run");
    println!("  config.step_timeout_secs = {}", settings.step_timeout_secs);
    println!("  config.precheck_timeout_secs = {}", settings.precheck_timeout_secs);
    println!(
        "  config.prerequisite_timeout_secs = {}",
        settings.prerequisite_timeout_secs
    );
    if let Some(ref dir) = settings.working_dir {
        println!("  config.working_dir = {}", dir.display());
    }
    println!();

    println!("prerequisites ({}):", cfg.gate().tools().len());
    for tool in cfg.gate().tools() {
        println!("  - {}: {}", tool.name(), tool.invocation());
    }
    println!();

    println!("steps ({}):", cfg.steps().len());
    for (i, step) in cfg.steps().iter().enumerate() {
        println!("  {}. {}", i + 1, step.name());
        println!("      cmd: {}", step.invocation());
        if !step.is_required() {
            println!("      required: false");
        }
        if let Some(check) = step.precheck() {
            println!("      check_cmd: {check}");
        }
        if let Some(hint) = step.remediation_hint() {
            println!("      install_hint: {hint}");
        }
    }

    debug!("dry-run complete (no execution)");
}
