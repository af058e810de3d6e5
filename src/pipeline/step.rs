// src/pipeline/step.rs

//! Step declarations.

use std::fmt;

/// Canonical step name type used throughout the pipeline.
pub type StepName = String;

/// An executable plus its ordered argument list.
///
/// No shell is involved: the program is looked up on `PATH` and the
/// arguments are passed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build an invocation from an argv-style list (`["cargo", "build"]`).
    ///
    /// Returns `None` for an empty list.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.iter().cloned()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Immutable declaration of one orchestrated action.
///
/// Built once by the caller (programmatically, from the built-in defaults or
/// from a config file) and never mutated while a run is in progress. The
/// `with_*` methods consume the descriptor, so a step handed to the
/// orchestrator cannot change underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    name: StepName,
    invocation: Invocation,
    description: String,
    required: bool,
    precheck: Option<Invocation>,
    remediation_hint: Option<String>,
}

impl StepDescriptor {
    /// A required step with no precheck and no remediation hint.
    pub fn new(
        name: impl Into<StepName>,
        invocation: Invocation,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            invocation,
            description: description.into(),
            required: true,
            precheck: None,
            remediation_hint: None,
        }
    }

    /// Mark the step optional: its failure is recorded but never prompts.
    pub fn optional(self) -> Self {
        self.with_required(false)
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Invocation run first to verify that the step's tool is available.
    pub fn with_precheck(mut self, precheck: Invocation) -> Self {
        self.precheck = Some(precheck);
        self
    }

    pub fn with_remediation_hint(mut self, hint: impl Into<String>) -> Self {
        self.remediation_hint = Some(hint.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn precheck(&self) -> Option<&Invocation> {
        self.precheck.as_ref()
    }

    pub fn remediation_hint(&self) -> Option<&str> {
        self.remediation_hint.as_deref()
    }
}
