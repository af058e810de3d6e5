// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::OrchestratorOptions;
use crate::gate::PrerequisiteGate;
use crate::pipeline::{StepDescriptor, defaults};
use crate::types::{NonInteractivePolicy, ReporterStyle};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// step_timeout_secs = 300
/// reporter = "plain"
///
/// [[prerequisite]]
/// name = "Git"
/// cmd = ["git", "--version"]
///
/// [[step]]
/// name = "Rust/Cargo Check"
/// cmd = ["cargo", "--version"]
/// check_cmd = ["cargo", "--version"]
/// install_hint = "Install Rust: https://rustup.rs/"
///
/// [[step]]
/// name = "Cargo Nextest"
/// cmd = ["cargo", "install", "--locked", "cargo-nextest"]
/// required = false
/// ```
///
/// Steps are an array of tables so the file order is the run order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Tools checked before the pipeline starts, from `[[prerequisite]]`.
    #[serde(default)]
    pub prerequisite: Vec<PrerequisiteConfig>,

    /// Steps in run order, from `[[step]]`.
    #[serde(default)]
    pub step: Vec<StepConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Timeout for each step's main command.
    #[serde(default = "default_step_timeout_secs")]
    pub step_timeout_secs: u64,

    /// Timeout for each step's `check_cmd`.
    #[serde(default = "default_check_timeout_secs")]
    pub precheck_timeout_secs: u64,

    /// Timeout for each `[[prerequisite]]` check.
    #[serde(default = "default_check_timeout_secs")]
    pub prerequisite_timeout_secs: u64,

    /// `"rich"` (default) or `"plain"`.
    #[serde(default)]
    pub reporter: ReporterStyle,

    /// When set, prompts are never shown: `"accept-all"` or `"abort"`.
    #[serde(default)]
    pub non_interactive: Option<NonInteractivePolicy>,

    /// Directory the steps run in; defaults to the current directory.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Hints printed after a fully successful run.
    #[serde(default)]
    pub next_steps: Vec<String>,
}

fn default_step_timeout_secs() -> u64 {
    300
}

fn default_check_timeout_secs() -> u64 {
    10
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            step_timeout_secs: default_step_timeout_secs(),
            precheck_timeout_secs: default_check_timeout_secs(),
            prerequisite_timeout_secs: default_check_timeout_secs(),
            reporter: ReporterStyle::default(),
            non_interactive: None,
            working_dir: None,
            next_steps: Vec::new(),
        }
    }
}

impl ConfigSection {
    pub fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            step_timeout: Duration::from_secs(self.step_timeout_secs),
            precheck_timeout: Duration::from_secs(self.precheck_timeout_secs),
        }
    }
}

/// `[[prerequisite]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PrerequisiteConfig {
    pub name: String,
    /// argv of the version check, e.g. `["git", "--version"]`.
    pub cmd: Vec<String>,
}

/// `[[step]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    /// Unique display name.
    pub name: String,

    /// argv of the step, e.g. `["cargo", "build"]`. No shell is involved.
    pub cmd: Vec<String>,

    /// Progress text; defaults to `"Running <name>"`.
    #[serde(default)]
    pub description: Option<String>,

    /// Required steps prompt on failure; optional ones never do.
    #[serde(default = "default_required")]
    pub required: bool,

    /// argv run first to check that the step's tool is installed.
    #[serde(default)]
    pub check_cmd: Option<Vec<String>>,

    /// Shown when the step fails.
    #[serde(default)]
    pub install_hint: Option<String>,
}

fn default_required() -> bool {
    true
}

/// Validated configuration, converted into the types the engine consumes.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::builtin`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    settings: ConfigSection,
    gate: PrerequisiteGate,
    steps: Vec<StepDescriptor>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        settings: ConfigSection,
        gate: PrerequisiteGate,
        steps: Vec<StepDescriptor>,
    ) -> Self {
        Self {
            settings,
            gate,
            steps,
        }
    }

    /// The built-in project setup pipeline.
    pub fn builtin() -> Self {
        let settings = ConfigSection {
            next_steps: defaults::next_steps(),
            ..ConfigSection::default()
        };
        let gate = defaults::prerequisite_gate()
            .with_timeout(Duration::from_secs(settings.prerequisite_timeout_secs));
        Self::new_unchecked(settings, gate, defaults::steps())
    }

    pub fn settings(&self) -> &ConfigSection {
        &self.settings
    }

    pub fn gate(&self) -> &PrerequisiteGate {
        &self.gate
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn into_parts(self) -> (ConfigSection, PrerequisiteGate, Vec<StepDescriptor>) {
        (self.settings, self.gate, self.steps)
    }
}
