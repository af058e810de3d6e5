use std::str::FromStr;
use serde::Deserialize;

/// Decision policy used when no human is available to answer prompts.
///
/// - `AcceptAll`: start the run and continue past every failed required step.
/// - `AbortOnRequiredFailure`: start the run, but answer every prompt with its
///   default. The start prompt defaults to "yes" and the continuation prompt
///   to "no", so the pipeline halts at the first failed required step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonInteractivePolicy {
    AcceptAll,
    #[default]
    #[serde(alias = "abort")]
    AbortOnRequiredFailure,
}

impl NonInteractivePolicy {
    /// Answer a prompt whose interactive default would be `default`.
    pub fn answer(self, default: bool) -> bool {
        match self {
            NonInteractivePolicy::AcceptAll => true,
            NonInteractivePolicy::AbortOnRequiredFailure => default,
        }
    }
}

impl FromStr for NonInteractivePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept-all" | "continue" => Ok(NonInteractivePolicy::AcceptAll),
            "abort" | "abort-on-required-failure" => {
                Ok(NonInteractivePolicy::AbortOnRequiredFailure)
            }
            other => Err(format!(
                "invalid non-interactive policy: {other} (expected \"accept-all\" or \"abort\")"
            )),
        }
    }
}

/// Which terminal renderer to use for progress and the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReporterStyle {
    /// ANSI colours, boxed header and an aligned summary table.
    #[default]
    Rich,
    /// Uncoloured line-oriented output, safe for logs and pipes.
    Plain,
}

impl FromStr for ReporterStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rich" => Ok(ReporterStyle::Rich),
            "plain" => Ok(ReporterStyle::Plain),
            other => Err(format!(
                "invalid reporter style: {other} (expected \"rich\" or \"plain\")"
            )),
        }
    }
}
