// src/pipeline/outcome.rs

//! Per-run classification results.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use super::step::StepName;

/// Maximum number of characters of captured stderr kept per failed step.
pub const STDERR_EXCERPT_CHARS: usize = 200;

/// Why a step was classified as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The invocation ran and exited with a non-zero status.
    ExitCode(i32),
    /// The invocation exceeded its timeout and was killed.
    TimedOut,
    /// The invocation's executable could not be located.
    ToolMissing,
    /// The precheck exited non-zero, so the invocation was never attempted.
    PrecheckFailed(i32),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::ExitCode(code) => write!(f, "exit code {code}"),
            FailureKind::TimedOut => f.write_str("timed out"),
            FailureKind::ToolMissing => f.write_str("command not found"),
            FailureKind::PrecheckFailed(code) => {
                write!(f, "tool not found (precheck exit code {code})")
            }
        }
    }
}

/// Classification of a single attempted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepVerdict {
    Succeeded,
    Failed(FailureKind),
}

impl StepVerdict {
    pub fn is_success(&self) -> bool {
        matches!(self, StepVerdict::Succeeded)
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            StepVerdict::Succeeded => None,
            StepVerdict::Failed(kind) => Some(*kind),
        }
    }
}

/// What the run recorded about one attempted step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: StepName,
    pub required: bool,
    pub verdict: StepVerdict,
    /// Truncated stderr of the failing invocation, if it produced any.
    pub stderr_excerpt: Option<String>,
}

/// Accumulated classification of a pipeline run.
///
/// The orchestrator is the only writer; everything handed to a reporter is a
/// shared reference. After the run, every step name is in exactly one of
/// `successful`, `failed`, `skipped` or `unattempted`. `skipped` is kept as a
/// category of its own but the orchestrator never fills it: steps left over
/// after a halt are `unattempted`.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    successful: Vec<StepName>,
    failed: Vec<StepName>,
    skipped: Vec<StepName>,
    unattempted: Vec<StepName>,
    records: Vec<StepRecord>,
    halted_at: Option<StepName>,
    started_at: DateTime<Local>,
    started: Instant,
    elapsed: Duration,
}

impl RunOutcome {
    /// Start a new, empty outcome. The elapsed clock starts now.
    pub(crate) fn start() -> Self {
        Self {
            successful: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            unattempted: Vec::new(),
            records: Vec::new(),
            halted_at: None,
            started_at: Local::now(),
            started: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn record(&mut self, record: StepRecord) {
        if record.verdict.is_success() {
            self.successful.push(record.name.clone());
        } else {
            self.failed.push(record.name.clone());
        }
        self.records.push(record);
    }

    /// Halt at `step`; `remaining` are left unclassified.
    pub(crate) fn halt<'a>(&mut self, step: &str, remaining: impl IntoIterator<Item = &'a str>) {
        self.halted_at = Some(step.to_string());
        self.unattempted
            .extend(remaining.into_iter().map(str::to_string));
    }

    pub(crate) fn finish(&mut self) {
        self.elapsed = self.started.elapsed();
    }

    pub fn successful(&self) -> &[StepName] {
        &self.successful
    }

    pub fn failed(&self) -> &[StepName] {
        &self.failed
    }

    pub fn skipped(&self) -> &[StepName] {
        &self.skipped
    }

    /// Steps never run because the pipeline halted before reaching them.
    pub fn unattempted(&self) -> &[StepName] {
        &self.unattempted
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn record_of(&self, name: &str) -> Option<&StepRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Name of the required step after which the user declined to continue.
    pub fn halted_at(&self) -> Option<&str> {
        self.halted_at.as_deref()
    }

    pub fn is_halted(&self) -> bool {
        self.halted_at.is_some()
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// True when the pipeline ran to the end and nothing failed.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && !self.is_halted()
    }
}

/// Trim `text` and cut it to at most `max_chars` characters, appending
/// `...` when something was dropped.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
