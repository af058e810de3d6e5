// src/report/plain.rs

//! Uncoloured, line-oriented renderer.

use std::io::Write;

use anyhow::Result;

use crate::engine::AbortReason;
use crate::exec::ExecutionResult;
use crate::gate::GateReport;
use crate::pipeline::outcome::STDERR_EXCERPT_CHARS;
use crate::pipeline::{RunOutcome, StepDescriptor, StepRecord, StepVerdict, excerpt};

use super::{PromptMode, STDOUT_PREVIEW_CHARS, Terminal, name_list};

const RULE_WIDTH: usize = 60;

/// Plain renderer writing to any `Write` sink.
#[derive(Debug)]
pub struct PlainTerminal<W: Write> {
    out: W,
    prompt: PromptMode,
    next_steps: Vec<String>,
}

impl<W: Write> PlainTerminal<W> {
    pub fn new(out: W, prompt: PromptMode) -> Self {
        Self {
            out,
            prompt,
            next_steps: Vec::new(),
        }
    }

    /// Hints printed after a fully successful run.
    pub fn with_next_steps(mut self, next_steps: Vec<String>) -> Self {
        self.next_steps = next_steps;
        self
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    fn rule(&mut self) -> Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }
}

impl<W: Write> Terminal for PlainTerminal<W> {
    fn header(&mut self) -> Result<()> {
        self.rule()?;
        writeln!(self.out, "PROJECT INSTALLATION & BUILD")?;
        writeln!(self.out, "Robust installation with comprehensive error handling")?;
        self.rule()
    }

    fn prerequisites(&mut self, report: &GateReport) -> Result<()> {
        writeln!(self.out, "\nChecking prerequisites...")?;
        for tool in &report.present {
            writeln!(self.out, "  [ok] {}: {}", tool.name, tool.version)?;
        }
        for name in &report.missing {
            writeln!(self.out, "  [missing] {name}")?;
        }
        Ok(())
    }

    fn pipeline_started(&mut self, step_count: usize) -> Result<()> {
        writeln!(self.out, "\nStarting installation of {step_count} components...")?;
        Ok(())
    }

    fn step_started(&mut self, position: usize, total: usize, step: &StepDescriptor) -> Result<()> {
        writeln!(self.out, "\nStep {position}/{total}: {}", step.name())?;
        writeln!(self.out, "  {}...", step.description())?;
        Ok(())
    }

    fn step_finished(
        &mut self,
        step: &StepDescriptor,
        record: &StepRecord,
        result: &ExecutionResult,
    ) -> Result<()> {
        match record.verdict {
            StepVerdict::Succeeded => {
                writeln!(self.out, "[ok] {} completed successfully", step.name())?;
                if !result.stdout.trim().is_empty() {
                    writeln!(
                        self.out,
                        "   Output: {}",
                        excerpt(&result.stdout, STDOUT_PREVIEW_CHARS)
                    )?;
                }
            }
            StepVerdict::Failed(kind) => {
                writeln!(self.out, "[FAIL] {} failed ({kind})", step.name())?;
                if !result.stderr.trim().is_empty() {
                    writeln!(
                        self.out,
                        "   Error: {}",
                        excerpt(&result.stderr, STDERR_EXCERPT_CHARS)
                    )?;
                }
                if let Some(hint) = step.remediation_hint() {
                    writeln!(self.out, "   Hint: {hint}")?;
                }
            }
        }
        Ok(())
    }

    fn required_failure(&mut self, step: &StepDescriptor) -> Result<()> {
        writeln!(self.out, "Critical failure in required component: {}", step.name())?;
        Ok(())
    }

    fn aborted(&mut self, reason: &AbortReason) -> Result<()> {
        match reason {
            AbortReason::EnvironmentMissing(tools) => {
                writeln!(self.out, "\nMissing prerequisites: {}", tools.join(", "))?;
                writeln!(self.out, "Please install the missing tools and run again.")?;
            }
            AbortReason::UserDeclined => {
                writeln!(self.out, "Installation cancelled by user.")?;
            }
        }
        Ok(())
    }

    fn summary(&mut self, outcome: &RunOutcome) -> Result<()> {
        writeln!(self.out)?;
        self.rule()?;
        writeln!(self.out, "INSTALLATION SUMMARY")?;
        self.rule()?;
        writeln!(self.out, "Successful: {}", outcome.successful().len())?;
        writeln!(self.out, "Failed: {}", outcome.failed().len())?;
        writeln!(self.out, "Skipped: {}", outcome.skipped().len())?;
        writeln!(self.out, "Not attempted: {}", outcome.unattempted().len())?;
        writeln!(
            self.out,
            "Started: {}",
            outcome.started_at().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(self.out, "Total time: {:.1} seconds", outcome.elapsed_seconds())?;

        if !outcome.failed().is_empty() {
            writeln!(self.out, "\nFailed components:")?;
            for record in outcome.records() {
                if let Some(kind) = record.verdict.failure() {
                    let tag = if record.required { "required" } else { "optional" };
                    writeln!(self.out, "  - {} ({tag}): {kind}", record.name)?;
                }
            }
        }

        if let Some(halted_at) = outcome.halted_at() {
            writeln!(
                self.out,
                "\nHalted after '{halted_at}'. Not attempted: {}",
                name_list(outcome.unattempted(), None)
            )?;
        }

        if outcome.all_succeeded() {
            writeln!(self.out, "\nAll installations completed successfully!")?;
            if !self.next_steps.is_empty() {
                writeln!(self.out, "\nNext steps:")?;
                for hint in &self.next_steps {
                    writeln!(self.out, "  * {hint}")?;
                }
            }
        } else {
            writeln!(
                self.out,
                "\nInstallation finished with {} failures.",
                outcome.failed().len()
            )?;
        }

        self.out.flush()?;
        Ok(())
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        self.prompt.confirm(&mut self.out, message, default)
    }
}
