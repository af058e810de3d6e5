// src/pipeline/defaults.rs

//! Built-in setup pipeline for a pnpm + Cargo + Tauri project.
//!
//! Used when `stepgate` is started without `--config`.

use crate::gate::{Prerequisite, PrerequisiteGate};

use super::step::{Invocation, StepDescriptor};

/// Tools that must be present before any step runs.
pub fn prerequisite_gate() -> PrerequisiteGate {
    PrerequisiteGate::new(vec![
        Prerequisite::new("Node.js", Invocation::new("node", ["--version"])),
        Prerequisite::new("npm", Invocation::new("npm", ["--version"])),
        Prerequisite::new("Git", Invocation::new("git", ["--version"])),
    ])
}

/// The ordered setup steps.
pub fn steps() -> Vec<StepDescriptor> {
    let pnpm_version = Invocation::new("pnpm", ["--version"]);
    let cargo_version = Invocation::new("cargo", ["--version"]);

    vec![
        StepDescriptor::new(
            "Node.js/pnpm Check",
            pnpm_version.clone(),
            "Checking if pnpm is available",
        )
        .with_precheck(pnpm_version)
        .with_remediation_hint("Install pnpm: npm install -g pnpm"),
        StepDescriptor::new(
            "Rust/Cargo Check",
            cargo_version.clone(),
            "Checking if Cargo is available",
        )
        .with_precheck(cargo_version)
        .with_remediation_hint("Install Rust: https://rustup.rs/"),
        StepDescriptor::new(
            "Frontend Dependencies",
            Invocation::new("pnpm", ["install"]),
            "Installing frontend dependencies with pnpm",
        ),
        StepDescriptor::new(
            "Rust Dependencies Fetch",
            Invocation::new("cargo", ["fetch"]),
            "Fetching Rust dependencies",
        ),
        StepDescriptor::new(
            "Rust Dependencies Build",
            Invocation::new("cargo", ["build"]),
            "Building Rust dependencies",
        ),
        StepDescriptor::new(
            "Tauri CLI",
            Invocation::new("cargo", ["install", "tauri-cli", "--version", "^1"]),
            "Installing Tauri CLI (latest v1.x)",
        ),
        StepDescriptor::new(
            "Cargo Nextest",
            Invocation::new("cargo", ["install", "--locked", "cargo-nextest"]),
            "Installing cargo-nextest for enhanced testing",
        ),
        StepDescriptor::new(
            "Cargo Helper Tools",
            Invocation::new("cargo", ["install", "cargo-edit", "cargo-watch"]),
            "Installing cargo-edit and cargo-watch utilities",
        ),
    ]
}

/// Hints printed after a fully successful run.
pub fn next_steps() -> Vec<String> {
    vec![
        "Run `cargo test` to verify Rust setup".to_string(),
        "Run `pnpm dev` to start development server".to_string(),
        "Run `cargo tauri dev` to start Tauri development".to_string(),
    ]
}
