#![allow(dead_code)]

use stepgate::gate::{Prerequisite, PrerequisiteGate};
use stepgate::pipeline::{Invocation, StepDescriptor};

/// Parse `"cargo build --release"` into an invocation.
pub fn invocation(cmd: &str) -> Invocation {
    let mut parts = cmd.split_whitespace();
    let program = parts.next().unwrap_or_default();
    Invocation::new(program, parts)
}

/// Required step named `name` running `cmd`.
pub fn required(name: &str, cmd: &str) -> StepDescriptor {
    StepDescriptor::new(name, invocation(cmd), format!("Running {name}"))
}

/// Optional step named `name` running `cmd`.
pub fn optional(name: &str, cmd: &str) -> StepDescriptor {
    required(name, cmd).optional()
}

/// Gate checking `tool --version` for each tool.
pub fn gate(tools: &[&str]) -> PrerequisiteGate {
    PrerequisiteGate::new(
        tools
            .iter()
            .map(|t| Prerequisite::new(*t, Invocation::new(*t, ["--version"])))
            .collect(),
    )
}

/// Builder for a TOML pipeline file, to simplify config tests.
pub struct PipelineTomlBuilder {
    config: Vec<String>,
    sections: Vec<String>,
}

impl PipelineTomlBuilder {
    pub fn new() -> Self {
        Self {
            config: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Add a raw `key = value` line to `[config]`.
    pub fn config_line(mut self, line: &str) -> Self {
        self.config.push(line.to_string());
        self
    }

    pub fn prerequisite(mut self, name: &str, cmd: &[&str]) -> Self {
        self.sections.push(format!(
            "[[prerequisite]]\nname = {name:?}\ncmd = {}\n",
            argv(cmd)
        ));
        self
    }

    pub fn step(self, name: &str, cmd: &[&str]) -> Self {
        self.step_with(name, cmd, &[])
    }

    /// Step with extra raw lines (`required = false`, `check_cmd = [...]`).
    pub fn step_with(mut self, name: &str, cmd: &[&str], extra: &[&str]) -> Self {
        let mut section = format!("[[step]]\nname = {name:?}\ncmd = {}\n", argv(cmd));
        for line in extra {
            section.push_str(line);
            section.push('\n');
        }
        self.sections.push(section);
        self
    }

    pub fn build(self) -> String {
        let mut out = String::new();
        if !self.config.is_empty() {
            out.push_str("[config]\n");
            for line in &self.config {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        for section in &self.sections {
            out.push_str(section);
            out.push('\n');
        }
        out
    }
}

impl Default for PipelineTomlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn argv(cmd: &[&str]) -> String {
    let quoted: Vec<String> = cmd.iter().map(|a| format!("{a:?}")).collect();
    format!("[{}]", quoted.join(", "))
}
