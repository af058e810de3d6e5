// src/engine/mod.rs

//! Pipeline orchestration engine.
//!
//! The continue/halt policy lives in a synchronous, deterministic core
//! ([`core`]) that consumes [`CoreEvent`]s and tells the shell what to do
//! next. The async shell ([`orchestrator`]) runs the prerequisite gate,
//! performs the process and terminal IO the core asks for, and feeds the
//! results back in.

use std::fmt;

use crate::exit_codes;
use crate::pipeline::RunOutcome;

/// Why a run stopped before any step was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// One or more prerequisite tools are absent.
    EnvironmentMissing(Vec<String>),
    /// The user declined the start confirmation.
    UserDeclined,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::EnvironmentMissing(tools) => {
                write!(f, "missing prerequisites: {}", tools.join(", "))
            }
            AbortReason::UserDeclined => f.write_str("installation cancelled by user"),
        }
    }
}

/// What a call to [`Orchestrator::run`] produced.
#[derive(Debug, Clone)]
pub enum RunResult {
    /// The pipeline ran to the end or was halted by the user mid-way.
    Completed(RunOutcome),
    /// The pipeline never started.
    Aborted(AbortReason),
}

impl RunResult {
    pub fn outcome(&self) -> Option<&RunOutcome> {
        match self {
            RunResult::Completed(outcome) => Some(outcome),
            RunResult::Aborted(_) => None,
        }
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            RunResult::Completed(_) => None,
            RunResult::Aborted(reason) => Some(reason),
        }
    }

    /// Process exit status for this result.
    ///
    /// Zero only when every step ran and none failed. A halt, any failed
    /// step (required or optional) and either abort reason are non-zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunResult::Completed(outcome) if outcome.all_succeeded() => exit_codes::SUCCESS,
            RunResult::Completed(_) => exit_codes::STEPS_FAILED,
            RunResult::Aborted(AbortReason::EnvironmentMissing(_)) => {
                exit_codes::ENVIRONMENT_MISSING
            }
            RunResult::Aborted(AbortReason::UserDeclined) => exit_codes::USER_DECLINED,
        }
    }
}

pub mod core;
pub mod orchestrator;

pub use core::{CoreCommand, CoreEvent, CoreStep, PipelineCore};
pub use orchestrator::{Orchestrator, OrchestratorOptions};
