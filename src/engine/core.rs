// src/engine/core.rs

//! Pure pipeline state machine.
//!
//! This module contains a synchronous, deterministic "core" that consumes
//! [`CoreEvent`]s and produces:
//! - an updated [`RunOutcome`]
//! - the next [`CoreCommand`] describing what the IO shell should do
//!
//! The async shell (`engine::orchestrator::Orchestrator`) is responsible for:
//! - running the prerequisite gate and the start confirmation
//! - executing prechecks and invocations through a `ProcessRunner`
//! - asking the terminal whether to continue after a required failure
//!
//! The core is intended to be unit tested without Tokio, processes or a
//! terminal: its control flow depends only on the data it is fed.

use tracing::{debug, info, warn};

use crate::exec::ExecutionResult;
use crate::pipeline::outcome::STDERR_EXCERPT_CHARS;
use crate::pipeline::{
    FailureKind, RunOutcome, StepDescriptor, StepRecord, StepVerdict, excerpt,
};

/// What the IO shell should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    /// Run the precheck of step `index`, then report `PrecheckCompleted`.
    RunPrecheck { index: usize },
    /// Run the main invocation of step `index`, then report `StepCompleted`.
    RunStep { index: usize },
    /// Step `index` is required and failed: ask whether to continue, then
    /// report `ContinueDecision`.
    AskToContinue { index: usize },
    /// Nothing left to do; collect the outcome with [`PipelineCore::finish`].
    Finished,
}

/// Input to the core, produced by the IO shell.
#[derive(Debug, Clone)]
pub enum CoreEvent {
    PrecheckCompleted(ExecutionResult),
    StepCompleted(ExecutionResult),
    ContinueDecision(bool),
}

/// Decision returned by the core after handling a single `CoreEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// The step classified by this event, if any.
    pub classified: Option<StepRecord>,
    /// What the shell should do next.
    pub next: CoreCommand,
}

/// Pure pipeline state.
///
/// Owns the ordered step list and the outcome accumulator. It has **no**
/// channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct PipelineCore {
    steps: Vec<StepDescriptor>,
    pending: CoreCommand,
    outcome: RunOutcome,
}

impl PipelineCore {
    /// Start a run over `steps`. The outcome's elapsed clock starts here.
    pub fn new(steps: Vec<StepDescriptor>) -> Self {
        let mut core = Self {
            steps,
            pending: CoreCommand::Finished,
            outcome: RunOutcome::start(),
        };
        core.pending = core.command_for(0);
        core
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn descriptor(&self, index: usize) -> &StepDescriptor {
        &self.steps[index]
    }

    /// The command the core is waiting on.
    pub fn next_command(&self) -> CoreCommand {
        self.pending
    }

    /// Read-only view of the outcome so far.
    pub fn outcome(&self) -> &RunOutcome {
        &self.outcome
    }

    /// Handle a single event, updating the outcome and returning what the
    /// shell should do next.
    ///
    /// An event that does not answer the pending command is ignored and the
    /// pending command is returned again.
    pub fn step(&mut self, event: CoreEvent) -> CoreStep {
        match (self.pending, event) {
            (CoreCommand::RunPrecheck { index }, CoreEvent::PrecheckCompleted(result)) => {
                if result.is_success() {
                    debug!(step = %self.steps[index].name(), "precheck passed");
                    self.proceed(None, CoreCommand::RunStep { index })
                } else {
                    let verdict = StepVerdict::Failed(FailureKind::PrecheckFailed(result.exit_code));
                    self.classify(index, verdict, &result)
                }
            }
            (CoreCommand::RunStep { index }, CoreEvent::StepCompleted(result)) => {
                let verdict = verdict_for(&result);
                self.classify(index, verdict, &result)
            }
            (CoreCommand::AskToContinue { index }, CoreEvent::ContinueDecision(true)) => {
                info!(step = %self.steps[index].name(), "continuing despite required failure");
                let next = self.command_for(index + 1);
                self.proceed(None, next)
            }
            (CoreCommand::AskToContinue { index }, CoreEvent::ContinueDecision(false)) => {
                let remaining = self.steps[index + 1..].iter().map(StepDescriptor::name);
                self.outcome.halt(self.steps[index].name(), remaining);
                info!(
                    step = %self.steps[index].name(),
                    unattempted = self.outcome.unattempted().len(),
                    "pipeline halted after required failure"
                );
                self.proceed(None, CoreCommand::Finished)
            }
            (pending, event) => {
                warn!(?pending, ?event, "event does not answer the pending command; ignoring");
                CoreStep {
                    classified: None,
                    next: pending,
                }
            }
        }
    }

    /// Stop the clock and hand the outcome over.
    pub fn finish(mut self) -> RunOutcome {
        if self.pending != CoreCommand::Finished {
            warn!(pending = ?self.pending, "finishing a pipeline that still has work pending");
        }
        self.outcome.finish();
        self.outcome
    }

    /// Record the verdict for step `index` and decide what follows it.
    fn classify(&mut self, index: usize, verdict: StepVerdict, result: &ExecutionResult) -> CoreStep {
        let step = &self.steps[index];
        let stderr_excerpt = match verdict {
            StepVerdict::Failed(_) if !result.stderr.trim().is_empty() => {
                Some(excerpt(&result.stderr, STDERR_EXCERPT_CHARS))
            }
            _ => None,
        };

        let record = StepRecord {
            name: step.name().to_string(),
            required: step.is_required(),
            verdict,
            stderr_excerpt,
        };

        let next = match verdict {
            StepVerdict::Succeeded => self.command_for(index + 1),
            StepVerdict::Failed(kind) if step.is_required() => {
                info!(step = %step.name(), %kind, "required step failed");
                CoreCommand::AskToContinue { index }
            }
            StepVerdict::Failed(kind) => {
                info!(step = %step.name(), %kind, "optional step failed; continuing");
                self.command_for(index + 1)
            }
        };

        self.outcome.record(record.clone());
        self.proceed(Some(record), next)
    }

    fn proceed(&mut self, classified: Option<StepRecord>, next: CoreCommand) -> CoreStep {
        self.pending = next;
        CoreStep { classified, next }
    }

    fn command_for(&self, index: usize) -> CoreCommand {
        match self.steps.get(index) {
            None => CoreCommand::Finished,
            Some(step) if step.precheck().is_some() => CoreCommand::RunPrecheck { index },
            Some(_) => CoreCommand::RunStep { index },
        }
    }
}

/// Classify a main-invocation result. Only exit code 0 succeeds; the flags
/// refine why a non-zero result failed.
pub fn verdict_for(result: &ExecutionResult) -> StepVerdict {
    if result.timed_out {
        StepVerdict::Failed(FailureKind::TimedOut)
    } else if result.tool_missing {
        StepVerdict::Failed(FailureKind::ToolMissing)
    } else if result.exit_code == 0 {
        StepVerdict::Succeeded
    } else {
        StepVerdict::Failed(FailureKind::ExitCode(result.exit_code))
    }
}
