// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only genuine faults travel as `Err`: a step that exits non-zero, times out
//! or cannot find its executable is ordinary data (see
//! [`crate::pipeline::FailureKind`]), and a refused confirmation is an
//! [`crate::engine::AbortReason`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StepgateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StepgateError>;
