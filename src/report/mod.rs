// src/report/mod.rs

//! Terminal collaborator: progress, summary and yes/no prompts.
//!
//! The orchestrator only sees the [`Terminal`] trait. Two implementations are
//! provided, selected once at startup by [`make_terminal`]:
//!
//! - [`RichTerminal`]: ANSI colours, a boxed header and an aligned summary
//!   table.
//! - [`PlainTerminal`]: uncoloured, line-oriented output.
//!
//! Both answer prompts through a [`PromptMode`], which is either a live
//! stdin prompt or a fixed [`NonInteractivePolicy`].

use std::io::{self, IsTerminal, Stdout};

use anyhow::Result;

use crate::engine::AbortReason;
use crate::exec::ExecutionResult;
use crate::gate::GateReport;
use crate::pipeline::{RunOutcome, StepDescriptor, StepRecord};
use crate::types::{NonInteractivePolicy, ReporterStyle};

pub mod plain;
pub mod prompt;
pub mod rich;

pub use plain::PlainTerminal;
pub use prompt::{PromptMode, parse_answer};
pub use rich::RichTerminal;

/// Characters of stdout shown after a successful step.
pub const STDOUT_PREVIEW_CHARS: usize = 100;

/// Question asked once before the first step.
pub const START_PROMPT: &str = "Continue with installation?";
/// Question asked after a required step fails.
pub const CONTINUE_PROMPT: &str = "Continue despite this failure?";

/// Presentation and prompting surface used by the orchestrator.
///
/// Rendering methods are purely observational. An `Err` from any of them is
/// logged by the caller and never changes how a step is classified.
pub trait Terminal {
    /// Banner shown before the prerequisite checks.
    fn header(&mut self) -> Result<()>;

    fn prerequisites(&mut self, report: &GateReport) -> Result<()>;

    /// Announced once before the first steps run.
    fn pipeline_started(&mut self, step_count: usize) -> Result<()>;

    /// `position` is 1-based.
    fn step_started(&mut self, position: usize, total: usize, step: &StepDescriptor) -> Result<()>;

    /// Shows the verdict; on failure also the truncated stderr and the
    /// step's remediation hint.
    fn step_finished(
        &mut self,
        step: &StepDescriptor,
        record: &StepRecord,
        result: &ExecutionResult,
    ) -> Result<()>;

    /// A required step failed; shown right before the continuation prompt.
    fn required_failure(&mut self, step: &StepDescriptor) -> Result<()>;

    fn aborted(&mut self, reason: &AbortReason) -> Result<()>;

    fn summary(&mut self, outcome: &RunOutcome) -> Result<()>;

    /// Yes/no question. `default` is the answer for an empty reply.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn header(&mut self) -> Result<()> {
        (**self).header()
    }

    fn prerequisites(&mut self, report: &GateReport) -> Result<()> {
        (**self).prerequisites(report)
    }

    fn pipeline_started(&mut self, step_count: usize) -> Result<()> {
        (**self).pipeline_started(step_count)
    }

    fn step_started(&mut self, position: usize, total: usize, step: &StepDescriptor) -> Result<()> {
        (**self).step_started(position, total, step)
    }

    fn step_finished(
        &mut self,
        step: &StepDescriptor,
        record: &StepRecord,
        result: &ExecutionResult,
    ) -> Result<()> {
        (**self).step_finished(step, record, result)
    }

    fn required_failure(&mut self, step: &StepDescriptor) -> Result<()> {
        (**self).required_failure(step)
    }

    fn aborted(&mut self, reason: &AbortReason) -> Result<()> {
        (**self).aborted(reason)
    }

    fn summary(&mut self, outcome: &RunOutcome) -> Result<()> {
        (**self).summary(outcome)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        (**self).confirm(message, default)
    }
}

/// Pick the renderer for this process.
///
/// A rich request falls back to plain output when stdout is not a terminal
/// or `NO_COLOR` is set.
pub fn make_terminal(
    style: ReporterStyle,
    policy: Option<NonInteractivePolicy>,
    next_steps: Vec<String>,
) -> Box<dyn Terminal> {
    let prompt = match policy {
        Some(policy) => PromptMode::Fixed(policy),
        None => PromptMode::Interactive,
    };

    let colour_ok = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let out: Stdout = io::stdout();

    match style {
        ReporterStyle::Rich if colour_ok => {
            Box::new(RichTerminal::new(out, prompt).with_next_steps(next_steps))
        }
        _ => Box::new(PlainTerminal::new(out, prompt).with_next_steps(next_steps)),
    }
}

/// Join at most `limit` names, noting how many were left out.
pub(crate) fn name_list(names: &[String], limit: Option<usize>) -> String {
    match limit {
        Some(limit) if names.len() > limit => format!(
            "{} (+{} more)",
            names[..limit].join(", "),
            names.len() - limit
        ),
        _ => names.join(", "),
    }
}
