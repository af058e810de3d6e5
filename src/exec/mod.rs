// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running step invocations, using
//! `tokio::process::Command`, and handing back an [`ExecutionResult`] for
//! every attempt.
//!
//! - [`backend`] provides the `ProcessRunner` trait and the result type that
//!   the orchestrator consumes, and which tests can replace with a fake
//!   implementation.
//! - [`command`] holds `TokioProcessRunner`, the production runner with
//!   timeout and kill handling.

pub mod backend;
pub mod command;

pub use backend::{
    ABNORMAL_EXIT_CODE, ExecutionResult, NOT_FOUND_EXIT_CODE, ProcessRunner, TIMEOUT_EXIT_CODE,
};
pub use command::TokioProcessRunner;
