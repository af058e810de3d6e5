// src/gate.rs

//! Prerequisite gate: environment checks that run before any step.
//!
//! A missing prerequisite is a hard stop for the whole run. It is not subject
//! to the continue-on-failure policy, since every later step would fail for a
//! reason the user cannot see from that step's output.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::exec::ProcessRunner;
use crate::pipeline::Invocation;

/// Default time allowed for each prerequisite check.
pub const DEFAULT_PREREQUISITE_TIMEOUT: Duration = Duration::from_secs(10);

/// A tool that must be present, and the invocation that proves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisite {
    name: String,
    invocation: Invocation,
}

impl Prerequisite {
    pub fn new(name: impl Into<String>, invocation: Invocation) -> Self {
        Self {
            name: name.into(),
            invocation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }
}

/// A prerequisite that answered its version check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentTool {
    pub name: String,
    /// First line of the check's stdout (usually a version string).
    pub version: String,
}

/// Result of running the gate once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateReport {
    pub present: Vec<PresentTool>,
    /// Names of absent tools, in declaration order.
    pub missing: Vec<String>,
}

impl GateReport {
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Fixed set of environment checks.
#[derive(Debug, Clone)]
pub struct PrerequisiteGate {
    tools: Vec<Prerequisite>,
    timeout: Duration,
}

impl PrerequisiteGate {
    pub fn new(tools: Vec<Prerequisite>) -> Self {
        Self {
            tools,
            timeout: DEFAULT_PREREQUISITE_TIMEOUT,
        }
    }

    /// A gate with no checks; always satisfied.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tools(&self) -> &[Prerequisite] {
        &self.tools
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run every check and classify each tool by exit code.
    ///
    /// A timed-out check or a missing executable counts as absent. The only
    /// side effects are the check invocations themselves, so calling this
    /// twice against the same environment yields the same report.
    pub async fn check<R>(&self, runner: &mut R) -> GateReport
    where
        R: ProcessRunner + ?Sized,
    {
        let mut report = GateReport::default();

        for tool in &self.tools {
            let result = runner.execute(&tool.invocation, self.timeout).await;

            if result.is_success() {
                let version = result.stdout.lines().next().unwrap_or("").trim().to_string();
                debug!(tool = %tool.name, %version, "prerequisite present");
                report.present.push(PresentTool {
                    name: tool.name.clone(),
                    version,
                });
            } else {
                warn!(
                    tool = %tool.name,
                    exit_code = result.exit_code,
                    timed_out = result.timed_out,
                    tool_missing = result.tool_missing,
                    "prerequisite missing"
                );
                report.missing.push(tool.name.clone());
            }
        }

        info!(
            present = report.present.len(),
            missing = ?report.missing,
            "prerequisite gate finished"
        );
        report
    }
}
