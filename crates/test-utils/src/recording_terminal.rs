use std::collections::VecDeque;

use anyhow::{bail, Result};
use stepgate::engine::AbortReason;
use stepgate::exec::ExecutionResult;
use stepgate::gate::GateReport;
use stepgate::pipeline::{RunOutcome, StepDescriptor, StepRecord};
use stepgate::report::Terminal;

/// Everything the orchestrator told the terminal, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Header,
    Prerequisites { missing: Vec<String> },
    PipelineStarted(usize),
    StepStarted { position: usize, name: String },
    StepFinished { name: String, success: bool },
    RequiredFailure(String),
    Aborted(AbortReason),
    Summary,
    Confirm { message: String, answer: bool },
}

/// A terminal that records events and answers prompts from a script.
///
/// Prompts beyond the scripted answers take their default. Output and prompt
/// faults can be switched on to exercise the orchestrator's fault handling;
/// events are still recorded when output fails.
#[derive(Debug, Default)]
pub struct RecordingTerminal {
    events: Vec<TerminalEvent>,
    answers: VecDeque<bool>,
    fail_output: bool,
    fail_prompts: bool,
}

impl RecordingTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers returned by successive `confirm` calls.
    pub fn with_answers(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.answers.extend(answers);
        self
    }

    /// Every rendering call returns an error.
    pub fn failing_output(mut self) -> Self {
        self.fail_output = true;
        self
    }

    /// Every `confirm` call returns an error.
    pub fn failing_prompts(mut self) -> Self {
        self.fail_prompts = true;
        self
    }

    pub fn events(&self) -> &[TerminalEvent] {
        &self.events
    }

    /// Messages of every prompt shown, in order.
    pub fn prompts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TerminalEvent::Confirm { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Names of steps announced as started, in order.
    pub fn started_steps(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TerminalEvent::StepStarted { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, event: TerminalEvent) -> Result<()> {
        self.events.push(event);
        if self.fail_output {
            bail!("terminal output sink closed");
        }
        Ok(())
    }
}

impl Terminal for RecordingTerminal {
    fn header(&mut self) -> Result<()> {
        self.push(TerminalEvent::Header)
    }

    fn prerequisites(&mut self, report: &GateReport) -> Result<()> {
        self.push(TerminalEvent::Prerequisites {
            missing: report.missing.clone(),
        })
    }

    fn pipeline_started(&mut self, step_count: usize) -> Result<()> {
        self.push(TerminalEvent::PipelineStarted(step_count))
    }

    fn step_started(&mut self, position: usize, _total: usize, step: &StepDescriptor) -> Result<()> {
        self.push(TerminalEvent::StepStarted {
            position,
            name: step.name().to_string(),
        })
    }

    fn step_finished(
        &mut self,
        step: &StepDescriptor,
        record: &StepRecord,
        _result: &ExecutionResult,
    ) -> Result<()> {
        self.push(TerminalEvent::StepFinished {
            name: step.name().to_string(),
            success: record.verdict.is_success(),
        })
    }

    fn required_failure(&mut self, step: &StepDescriptor) -> Result<()> {
        self.push(TerminalEvent::RequiredFailure(step.name().to_string()))
    }

    fn aborted(&mut self, reason: &AbortReason) -> Result<()> {
        self.push(TerminalEvent::Aborted(reason.clone()))
    }

    fn summary(&mut self, _outcome: &RunOutcome) -> Result<()> {
        self.push(TerminalEvent::Summary)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        if self.fail_prompts {
            bail!("stdin closed");
        }
        let answer = self.answers.pop_front().unwrap_or(default);
        self.events.push(TerminalEvent::Confirm {
            message: message.to_string(),
            answer,
        });
        Ok(answer)
    }
}
