// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::NonInteractivePolicy;

/// Command-line arguments for `stepgate`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stepgate",
    version,
    about = "Run an ordered list of setup steps with prerequisite checks and failure policy.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a pipeline file (TOML).
    ///
    /// If omitted, the built-in project setup pipeline is used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Never prompt: start immediately and continue past every failure.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Never prompt; failures of required steps are handled per `--on-failure`.
    #[arg(long)]
    pub non_interactive: bool,

    /// What to do after a required step fails when not prompting.
    ///
    /// Implies `--non-interactive`.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_failure: Option<OnFailure>,

    /// Uncoloured, line-oriented output.
    #[arg(long)]
    pub plain: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STEPGATE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the prerequisites and steps, but don't execute any commands.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Non-interactive policy requested on the command line, if any.
    pub fn policy(&self) -> Option<NonInteractivePolicy> {
        if self.yes {
            return Some(NonInteractivePolicy::AcceptAll);
        }
        match (self.on_failure, self.non_interactive) {
            (Some(OnFailure::Continue), _) => Some(NonInteractivePolicy::AcceptAll),
            (Some(OnFailure::Abort), _) | (None, true) => {
                Some(NonInteractivePolicy::AbortOnRequiredFailure)
            }
            (None, false) => None,
        }
    }
}

/// `--on-failure` values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OnFailure {
    /// Continue past every failed required step.
    Continue,
    /// Halt at the first failed required step.
    Abort,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
