// src/pipeline/mod.rs

//! Pipeline data model.
//!
//! - [`step`] holds the immutable step declarations (`StepDescriptor`,
//!   `Invocation`).
//! - [`outcome`] holds the per-run accumulator (`RunOutcome`) and the
//!   classification types produced for every attempted step.
//! - [`defaults`] provides the built-in project setup pipeline used when no
//!   config file is given.

pub mod defaults;
pub mod outcome;
pub mod step;

pub use outcome::{FailureKind, RunOutcome, StepRecord, StepVerdict, excerpt};
pub use step::{Invocation, StepDescriptor, StepName};
