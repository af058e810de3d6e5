// src/config/mod.rs

//! Pipeline file loading and validation for stepgate.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a pipeline file from disk (`loader.rs`).
//! - Validate it and convert it into engine types (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{ConfigFile, ConfigSection, PrerequisiteConfig, RawConfigFile, StepConfig};
