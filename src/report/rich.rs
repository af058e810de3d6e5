// src/report/rich.rs

//! Colour renderer: boxed header, coloured step lines, summary table.

use std::io::Write;

use anyhow::Result;

use crate::engine::AbortReason;
use crate::exec::ExecutionResult;
use crate::gate::GateReport;
use crate::pipeline::outcome::STDERR_EXCERPT_CHARS;
use crate::pipeline::{FailureKind, RunOutcome, StepDescriptor, StepRecord, StepVerdict, excerpt};

use super::{PromptMode, STDOUT_PREVIEW_CHARS, Terminal, name_list};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";

/// Successful step names shown in the summary table before "(+N more)".
const SUCCESS_NAMES_SHOWN: usize = 3;

/// ANSI renderer writing to any `Write` sink.
#[derive(Debug)]
pub struct RichTerminal<W: Write> {
    out: W,
    prompt: PromptMode,
    next_steps: Vec<String>,
}

impl<W: Write> RichTerminal<W> {
    pub fn new(out: W, prompt: PromptMode) -> Self {
        Self {
            out,
            prompt,
            next_steps: Vec::new(),
        }
    }

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

    fn boxed(&mut self, lines: &[&str], colour: &str) -> Result<()> {
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        writeln!(self.out, "{colour}╭{}╮{RESET}", "─".repeat(width + 2))?;
        for line in lines {
            let pad = width - line.chars().count();
            writeln!(
                self.out,
                "{colour}│{RESET} {BOLD}{line}{RESET}{} {colour}│{RESET}",
                " ".repeat(pad)
            )?;
        }
        writeln!(self.out, "{colour}╰{}╯{RESET}", "─".repeat(width + 2))?;
        Ok(())
    }

    fn summary_table(&mut self, rows: &[(&str, &str, usize, String)]) -> Result<()> {
        let headers = ("Status", "Count", "Components");
        let status_w = rows
            .iter()
            .map(|(label, ..)| label.chars().count())
            .chain([headers.0.len()])
            .max()
            .unwrap_or(0);
        let count_w = rows
            .iter()
            .map(|(_, _, count, _)| count.to_string().len())
            .chain([headers.1.len()])
            .max()
            .unwrap_or(0);

        writeln!(self.out, "\n{BOLD}Installation Summary{RESET}")?;
        writeln!(
            self.out,
            "{BOLD}{MAGENTA}{:<status_w$}  {:>count_w$}  {}{RESET}",
            headers.0, headers.1, headers.2
        )?;
        writeln!(
            self.out,
            "{DIM}{}  {}  {}{RESET}",
            "─".repeat(status_w),
            "─".repeat(count_w),
            "─".repeat(headers.2.len())
        )?;
        for (label, colour, count, names) in rows {
            writeln!(
                self.out,
                "{colour}{BOLD}{label:<status_w$}{RESET}  {count:>count_w$}  {names}"
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Terminal for RichTerminal<W> {
    fn header(&mut self) -> Result<()> {
        self.boxed(
            &[
                "Project Installation & Build",
                "Robust installation with comprehensive error handling",
            ],
            BLUE,
        )
    }

    fn prerequisites(&mut self, report: &GateReport) -> Result<()> {
        writeln!(self.out, "\n{BOLD}{YELLOW}🔍 Checking prerequisites...{RESET}")?;
        for tool in &report.present {
            writeln!(self.out, "  {GREEN}✔{RESET} {}: {GREEN}{}{RESET}", tool.name, tool.version)?;
        }
        for name in &report.missing {
            writeln!(self.out, "  {RED}✘{RESET} {name}: {RED}not found{RESET}")?;
        }
        Ok(())
    }

    fn pipeline_started(&mut self, step_count: usize) -> Result<()> {
        writeln!(
            self.out,
            "\n{BOLD}{BLUE}🛠  Starting installation of {step_count} components...{RESET}"
        )?;
        Ok(())
    }

    fn step_started(&mut self, position: usize, total: usize, step: &StepDescriptor) -> Result<()> {
        writeln!(self.out, "\n{BOLD}Step {position}/{total}:{RESET} {}", step.name())?;
        writeln!(self.out, "  {DIM}⠿ {}...{RESET}", step.description())?;
        self.out.flush()?;
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
                writeln!(self.out, "{GREEN}✔ {} completed successfully{RESET}", step.name())?;
                if !result.stdout.trim().is_empty() {
                    writeln!(
                        self.out,
                        "{DIM}   Output: {}{RESET}",
                        excerpt(&result.stdout, STDOUT_PREVIEW_CHARS)
                    )?;
                }
            }
            StepVerdict::Failed(kind) => {
                let (glyph, colour) = match kind {
                    FailureKind::TimedOut => ("⏰", RED),
                    FailureKind::PrecheckFailed(_) => ("⚠", YELLOW),
                    FailureKind::ToolMissing | FailureKind::ExitCode(_) => ("✘", RED),
                };
                writeln!(self.out, "{colour}{glyph} {} failed ({kind}){RESET}", step.name())?;
                if !result.stderr.trim().is_empty() {
                    writeln!(
                        self.out,
                        "{RED}   Error: {}{RESET}",
                        excerpt(&result.stderr, STDERR_EXCERPT_CHARS)
                    )?;
                }
                if let Some(hint) = step.remediation_hint() {
                    writeln!(self.out, "{YELLOW}💡 Hint: {hint}{RESET}")?;
                }
            }
        }
        Ok(())
    }

    fn required_failure(&mut self, step: &StepDescriptor) -> Result<()> {
        writeln!(
            self.out,
            "{RED}💥 Critical failure in required component: {}{RESET}",
            step.name()
        )?;
        Ok(())
    }

    fn aborted(&mut self, reason: &AbortReason) -> Result<()> {
        match reason {
            AbortReason::EnvironmentMissing(tools) => {
                writeln!(
                    self.out,
                    "\n{BOLD}{RED}✘ Missing prerequisites: {}{RESET}",
                    tools.join(", ")
                )?;
                writeln!(
                    self.out,
                    "{YELLOW}Please install the missing tools and run again.{RESET}"
                )?;
            }
            AbortReason::UserDeclined => {
                writeln!(self.out, "{YELLOW}Installation cancelled by user.{RESET}")?;
            }
        }
        Ok(())
    }

    fn summary(&mut self, outcome: &RunOutcome) -> Result<()> {
        let mut rows = Vec::new();
        if !outcome.successful().is_empty() {
            rows.push((
                "Successful",
                GREEN,
                outcome.successful().len(),
                name_list(outcome.successful(), Some(SUCCESS_NAMES_SHOWN)),
            ));
        }
        if !outcome.failed().is_empty() {
            rows.push((
                "Failed",
                RED,
                outcome.failed().len(),
                name_list(outcome.failed(), None),
            ));
        }
        if !outcome.skipped().is_empty() {
            rows.push((
                "Skipped",
                YELLOW,
                outcome.skipped().len(),
                name_list(outcome.skipped(), None),
            ));
        }
        if !outcome.unattempted().is_empty() {
            rows.push((
                "Not attempted",
                DIM,
                outcome.unattempted().len(),
                name_list(outcome.unattempted(), None),
            ));
        }

        writeln!(self.out)?;
        self.summary_table(&rows)?;

        for record in outcome.records() {
            match record.verdict.failure() {
                Some(FailureKind::TimedOut) => {
                    writeln!(self.out, "{RED}   {} hung and was killed{RESET}", record.name)?;
                }
                Some(FailureKind::ToolMissing) | Some(FailureKind::PrecheckFailed(_)) => {
                    writeln!(self.out, "{YELLOW}   {}: tool not found{RESET}", record.name)?;
                }
                _ => {}
            }
        }

        if let Some(halted_at) = outcome.halted_at() {
            writeln!(
                self.out,
                "\n{YELLOW}Halted after '{halted_at}'; remaining steps were not attempted.{RESET}"
            )?;
        }

        let elapsed = outcome.elapsed_seconds();
        if outcome.all_succeeded() {
            writeln!(
                self.out,
                "\n{BOLD}{GREEN}🎉 All installations completed successfully!{RESET}"
            )?;
            writeln!(self.out, "{GREEN}Total time: {elapsed:.1} seconds{RESET}")?;
            if !self.next_steps.is_empty() {
                writeln!(self.out, "\n{BOLD}{BLUE}Next steps:{RESET}")?;
                for hint in &self.next_steps {
                    writeln!(self.out, "• {hint}")?;
                }
            }
        } else {
            writeln!(
                self.out,
                "\n{BOLD}{YELLOW}⚠  Installation finished with {} failures{RESET}",
                outcome.failed().len()
            )?;
            writeln!(
                self.out,
                "{YELLOW}Please review the failed components and install them manually if needed.{RESET}"
            )?;
            writeln!(self.out, "{DIM}Total time: {elapsed:.1} seconds{RESET}")?;
        }

        self.out.flush()?;
        Ok(())
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let question = format!("{BOLD}{message}{RESET}");
        self.prompt.confirm(&mut self.out, &question, default)
    }
}
