#![allow(dead_code, unused_imports)]

pub use stepgate_test_utils::builders;
pub use stepgate_test_utils::init_tracing;

use stepgate::engine::{Orchestrator, OrchestratorOptions, RunResult};
use stepgate::gate::PrerequisiteGate;
use stepgate::pipeline::{RunOutcome, StepDescriptor};
use stepgate_test_utils::{FakeRunner, RecordingTerminal};

/// Run `steps` behind `gate` with a fake runner and a recording terminal.
pub async fn run_pipeline(
    runner: FakeRunner,
    terminal: RecordingTerminal,
    gate: &PrerequisiteGate,
    steps: Vec<StepDescriptor>,
) -> (RunResult, FakeRunner, RecordingTerminal) {
    let mut orchestrator = Orchestrator::new(runner, terminal, OrchestratorOptions::default());
    let result = orchestrator.run(gate, steps).await;
    let (runner, terminal) = orchestrator.into_parts();
    (result, runner, terminal)
}

/// Unwrap a completed run.
pub fn completed(result: &RunResult) -> &RunOutcome {
    match result.outcome() {
        Some(outcome) => outcome,
        None => panic!("expected a completed run, got {:?}", result),
    }
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
