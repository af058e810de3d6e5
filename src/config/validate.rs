// src/config/validate.rs

use std::collections::HashSet;
use std::time::Duration;

use crate::config::model::{ConfigFile, PrerequisiteConfig, RawConfigFile, StepConfig};
use crate::errors::{Result, StepgateError};
use crate::gate::{Prerequisite, PrerequisiteGate};
use crate::pipeline::{Invocation, StepDescriptor};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::StepgateError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_steps(&raw)?;
        validate_global_config(&raw)?;
        ensure_unique("step", raw.step.iter().map(|s| s.name.as_str()))?;
        ensure_unique("prerequisite", raw.prerequisite.iter().map(|p| p.name.as_str()))?;

        let prerequisites = raw
            .prerequisite
            .iter()
            .map(build_prerequisite)
            .collect::<Result<Vec<_>>>()?;
        let gate = PrerequisiteGate::new(prerequisites)
            .with_timeout(Duration::from_secs(raw.config.prerequisite_timeout_secs));

        let steps = raw
            .step
            .iter()
            .map(build_step)
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigFile::new_unchecked(raw.config, gate, steps))
    }
}

fn ensure_has_steps(cfg: &RawConfigFile) -> Result<()> {
    if cfg.step.is_empty() {
        return Err(StepgateError::ConfigError(
            "config must contain at least one [[step]] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    let timeouts = [
        ("step_timeout_secs", cfg.config.step_timeout_secs),
        ("precheck_timeout_secs", cfg.config.precheck_timeout_secs),
        ("prerequisite_timeout_secs", cfg.config.prerequisite_timeout_secs),
    ];

    for (key, value) in timeouts {
        if value == 0 {
            return Err(StepgateError::ConfigError(format!(
                "[config].{key} must be >= 1 (got 0)"
            )));
        }
    }

    Ok(())
}

fn ensure_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(StepgateError::ConfigError(format!("{kind} name must not be empty")));
        }
        if !seen.insert(name) {
            return Err(StepgateError::ConfigError(format!(
                "duplicate {kind} name '{name}'"
            )));
        }
    }
    Ok(())
}

fn invocation(owner: &str, field: &str, argv: &[String]) -> Result<Invocation> {
    match Invocation::from_argv(argv) {
        Some(inv) if !inv.program().trim().is_empty() => Ok(inv),
        _ => Err(StepgateError::ConfigError(format!(
            "'{owner}' has an empty `{field}`"
        ))),
    }
}

fn build_prerequisite(cfg: &PrerequisiteConfig) -> Result<Prerequisite> {
    let inv = invocation(&cfg.name, "cmd", &cfg.cmd)?;
    Ok(Prerequisite::new(cfg.name.clone(), inv))
}

fn build_step(cfg: &StepConfig) -> Result<StepDescriptor> {
    let inv = invocation(&cfg.name, "cmd", &cfg.cmd)?;
    let description = cfg
        .description
        .clone()
        .unwrap_or_else(|| format!("Running {}", cfg.name));

    let mut step = StepDescriptor::new(cfg.name.clone(), inv, description)
        .with_required(cfg.required);

    if let Some(check) = &cfg.check_cmd {
        step = step.with_precheck(invocation(&cfg.name, "check_cmd", check)?);
    }
    if let Some(hint) = &cfg.install_hint {
        step = step.with_remediation_hint(hint.clone());
    }

    Ok(step)
}
