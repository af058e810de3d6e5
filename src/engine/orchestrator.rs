// src/engine/orchestrator.rs

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::exec::{ExecutionResult, ProcessRunner};
use crate::gate::PrerequisiteGate;
use crate::pipeline::StepDescriptor;
use crate::report::{CONTINUE_PROMPT, START_PROMPT, Terminal};

use super::core::{CoreCommand, CoreEvent, PipelineCore};
use super::{AbortReason, RunResult};

/// Default time allowed for a step's main invocation.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(300);
/// Default time allowed for a step's precheck.
pub const DEFAULT_PRECHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeouts applied by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub step_timeout: Duration,
    pub precheck_timeout: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            step_timeout: DEFAULT_STEP_TIMEOUT,
            precheck_timeout: DEFAULT_PRECHECK_TIMEOUT,
        }
    }
}

/// Runs the prerequisite gate and then the steps, strictly one at a time.
///
/// This is an IO shell around [`PipelineCore`], which holds the
/// classification and continue/halt semantics. This struct performs the
/// process and terminal calls the core asks for. Terminal faults are logged
/// and counted but never change the result.
pub struct Orchestrator<R: ProcessRunner, T: Terminal> {
    runner: R,
    terminal: T,
    options: OrchestratorOptions,
    terminal_faults: usize,
}

impl<R: ProcessRunner, T: Terminal> fmt::Debug for Orchestrator<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("options", &self.options)
            .field("terminal_faults", &self.terminal_faults)
            .finish_non_exhaustive()
    }
}

impl<R: ProcessRunner, T: Terminal> Orchestrator<R, T> {
    pub fn new(runner: R, terminal: T, options: OrchestratorOptions) -> Self {
        Self {
            runner,
            terminal,
            options,
            terminal_faults: 0,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn into_parts(self) -> (R, T) {
        (self.runner, self.terminal)
    }

    /// Number of terminal calls that returned an error so far.
    pub fn terminal_faults(&self) -> usize {
        self.terminal_faults
    }

    /// Run the whole pipeline.
    ///
    /// 1. Prerequisite gate: any missing tool aborts before a step runs.
    /// 2. One start confirmation (default yes).
    /// 3. Every step in order; a failed required step asks whether to
    ///    continue (default no), and declining halts the pipeline.
    ///
    /// Elapsed time is measured from entry into this method.
    pub async fn run(&mut self, gate: &PrerequisiteGate, steps: Vec<StepDescriptor>) -> RunResult {
        let mut core = PipelineCore::new(steps);
        let total = core.len();

        self.render("header", |t| t.header());

        let gate_report = gate.check(&mut self.runner).await;
        self.render("prerequisites", |t| t.prerequisites(&gate_report));

        if !gate_report.is_satisfied() {
            return self.abort(AbortReason::EnvironmentMissing(gate_report.missing));
        }

        if !self.confirm(START_PROMPT, true) {
            return self.abort(AbortReason::UserDeclined);
        }

        info!(steps = total, "starting pipeline");
        self.render("pipeline_started", |t| t.pipeline_started(total));

        let mut command = core.next_command();
        let mut announced = None;

        loop {
            let (index, event) = match command {
                CoreCommand::Finished => break,
                CoreCommand::RunPrecheck { index } => {
                    self.announce(&core, index, &mut announced);
                    let step = core.descriptor(index);
                    let result = match step.precheck() {
                        Some(precheck) => {
                            debug!(step = %step.name(), cmd = %precheck, "running precheck");
                            self.runner
                                .execute(precheck, self.options.precheck_timeout)
                                .await
                        }
                        // The core only asks for prechecks that exist; treat
                        // a missing one as passed.
                        None => ExecutionResult::success(""),
                    };
                    (index, CoreEvent::PrecheckCompleted(result))
                }
                CoreCommand::RunStep { index } => {
                    self.announce(&core, index, &mut announced);
                    let step = core.descriptor(index);
                    debug!(step = %step.name(), cmd = %step.invocation(), "running step");
                    let result = self
                        .runner
                        .execute(step.invocation(), self.options.step_timeout)
                        .await;
                    (index, CoreEvent::StepCompleted(result))
                }
                CoreCommand::AskToContinue { index } => {
                    let step = core.descriptor(index);
                    self.render("required_failure", |t| t.required_failure(step));
                    let answer = self.confirm(CONTINUE_PROMPT, false);
                    (index, CoreEvent::ContinueDecision(answer))
                }
            };

            let result = match &event {
                CoreEvent::PrecheckCompleted(r) | CoreEvent::StepCompleted(r) => Some(r.clone()),
                CoreEvent::ContinueDecision(_) => None,
            };

            let step = core.step(event);

            if let (Some(record), Some(result)) = (&step.classified, &result) {
                let descriptor = core.descriptor(index);
                self.render("step_finished", |t| t.step_finished(descriptor, record, result));
            }

            command = step.next;
        }

        let outcome = core.finish();
        info!(
            successful = outcome.successful().len(),
            failed = outcome.failed().len(),
            unattempted = outcome.unattempted().len(),
            halted = outcome.is_halted(),
            elapsed_secs = outcome.elapsed_seconds(),
            "pipeline finished"
        );
        RunResult::Completed(outcome)
    }

    fn announce(&mut self, core: &PipelineCore, index: usize, announced: &mut Option<usize>) {
        if *announced == Some(index) {
            return;
        }
        *announced = Some(index);
        let step = core.descriptor(index);
        self.render("step_started", |t| t.step_started(index + 1, core.len(), step));
    }

    fn abort(&mut self, reason: AbortReason) -> RunResult {
        warn!(%reason, "run aborted before any step");
        self.render("aborted", |t| t.aborted(&reason));
        RunResult::Aborted(reason)
    }

    /// Ask the terminal; a failing prompt falls back to `default`.
    fn confirm(&mut self, message: &str, default: bool) -> bool {
        match self.terminal.confirm(message, default) {
            Ok(answer) => {
                debug!(%message, answer, "confirmation answered");
                answer
            }
            Err(e) => {
                self.terminal_faults += 1;
                warn!(%message, error = %e, default, "prompt failed; using default answer");
                default
            }
        }
    }

    fn render<F>(&mut self, what: &str, f: F)
    where
        F: FnOnce(&mut T) -> anyhow::Result<()>,
    {
        if let Err(e) = f(&mut self.terminal) {
            self.terminal_faults += 1;
            warn!(event = what, error = %e, "terminal output failed; continuing");
        }
    }
}
