// src/exec/backend.rs

//! Pluggable process runner abstraction.
//!
//! The orchestrator and the prerequisite gate talk to a `ProcessRunner`
//! instead of spawning processes themselves. This makes it easy to swap in a
//! fake runner in tests while keeping the production implementation in
//! [`super::command`].
//!
//! - `TokioProcessRunner` is the default implementation used by `stepgate`.
//! - Tests can provide their own `ProcessRunner` that, for example, records
//!   which invocations were requested and returns scripted results.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::pipeline::Invocation;

/// Exit code reported when the executable could not be located.
pub const NOT_FOUND_EXIT_CODE: i32 = 127;
/// Exit code reported when the invocation was killed after its timeout.
pub const TIMEOUT_EXIT_CODE: i32 = 124;
/// Exit code reported for a signal-terminated child or an unexpected IO
/// fault while spawning or waiting.
pub const ABNORMAL_EXIT_CODE: i32 = -1;

/// Result of one invocation attempt.
///
/// Every way a process can go wrong is represented here; runners never turn
/// "the command failed" into an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Genuine exit status, or a synthetic one for the fault classes.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// The wall-clock timeout elapsed; the child was killed and its partial
    /// output discarded.
    pub timed_out: bool,
    /// The executable could not be located.
    pub tool_missing: bool,
    pub duration: Duration,
}

impl ExecutionResult {
    /// The process ran and exited with `exit_code`.
    pub fn completed(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            timed_out: false,
            tool_missing: false,
            duration: Duration::ZERO,
        }
    }

    /// Exit code 0 with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self::completed(0, stdout, "")
    }

    pub fn not_found(program: &str) -> Self {
        Self {
            tool_missing: true,
            ..Self::completed(
                NOT_FOUND_EXIT_CODE,
                "",
                format!("command not found: {program}"),
            )
        }
    }

    pub fn timed_out(timeout: Duration) -> Self {
        Self {
            timed_out: true,
            duration: timeout,
            ..Self::completed(
                TIMEOUT_EXIT_CODE,
                "",
                format!("timed out after {}s", timeout.as_secs_f64()),
            )
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out && !self.tool_missing
    }
}

/// Trait abstracting how a single invocation is executed.
///
/// Production code uses [`super::TokioProcessRunner`]; tests can provide
/// their own implementation that doesn't spawn real processes.
pub trait ProcessRunner: Send {
    /// Run `invocation` to completion or until `timeout` elapses.
    ///
    /// The implementation must spawn at most one child, fully consume its
    /// output and make sure the child is gone before the future resolves.
    fn execute<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>>;
}
