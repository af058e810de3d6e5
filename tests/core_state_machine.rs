// tests/core_state_machine.rs

mod common;
use crate::common::builders::{invocation, optional, required};
use crate::common::names;

use std::time::Duration;

use stepgate::engine::core::verdict_for;
use stepgate::engine::{CoreCommand, CoreEvent, PipelineCore};
use stepgate::exec::ExecutionResult;
use stepgate::pipeline::{FailureKind, StepVerdict};

fn ok() -> CoreEvent {
    CoreEvent::StepCompleted(ExecutionResult::success(""))
}

fn fail(code: i32) -> CoreEvent {
    CoreEvent::StepCompleted(ExecutionResult::completed(code, "", "error output"))
}

#[test]
fn empty_pipeline_is_immediately_finished() {
    let core = PipelineCore::new(Vec::new());
    assert!(core.is_empty());
    assert_eq!(core.next_command(), CoreCommand::Finished);

    let outcome = core.finish();
    assert!(outcome.all_succeeded());
    assert!(outcome.records().is_empty());
}

#[test]
fn steps_without_precheck_start_with_run_step() {
    let core = PipelineCore::new(vec![required("A", "a")]);
    assert_eq!(core.next_command(), CoreCommand::RunStep { index: 0 });
}

#[test]
fn steps_with_precheck_start_with_run_precheck() {
    let core = PipelineCore::new(vec![required("A", "a").with_precheck(invocation("a --version"))]);
    assert_eq!(core.next_command(), CoreCommand::RunPrecheck { index: 0 });
}

#[test]
fn successes_advance_in_order() {
    let mut core = PipelineCore::new(vec![required("A", "a"), optional("B", "b")]);

    let step = core.step(ok());
    assert_eq!(step.next, CoreCommand::RunStep { index: 1 });
    let record = step.classified.expect("A classified");
    assert_eq!(record.name, "A");
    assert!(record.required);
    assert_eq!(record.verdict, StepVerdict::Succeeded);
    assert!(record.stderr_excerpt.is_none());

    let step = core.step(ok());
    assert_eq!(step.next, CoreCommand::Finished);

    let outcome = core.finish();
    assert_eq!(outcome.successful(), names(&["A", "B"]).as_slice());
}

#[test]
fn required_failure_asks_and_decline_halts() {
    let mut core = PipelineCore::new(vec![
        required("A", "a"),
        required("B", "b"),
        optional("C", "c"),
    ]);

    core.step(fail(3));
    assert_eq!(core.next_command(), CoreCommand::AskToContinue { index: 0 });
    assert_eq!(core.outcome().failed(), names(&["A"]).as_slice());

    let step = core.step(CoreEvent::ContinueDecision(false));
    assert!(step.classified.is_none());
    assert_eq!(step.next, CoreCommand::Finished);

    let outcome = core.finish();
    assert_eq!(outcome.halted_at(), Some("A"));
    assert_eq!(outcome.unattempted(), names(&["B", "C"]).as_slice());
    assert!(outcome.successful().is_empty());
    assert!(!outcome.all_succeeded());
}

#[test]
fn required_failure_accepted_moves_on() {
    let mut core = PipelineCore::new(vec![required("A", "a"), required("B", "b")]);

    core.step(fail(1));
    let step = core.step(CoreEvent::ContinueDecision(true));
    assert_eq!(step.next, CoreCommand::RunStep { index: 1 });

    core.step(ok());
    let outcome = core.finish();
    assert!(!outcome.is_halted());
    assert_eq!(outcome.failed(), names(&["A"]).as_slice());
    assert_eq!(outcome.successful(), names(&["B"]).as_slice());
}

#[test]
fn optional_failure_skips_the_question() {
    let mut core = PipelineCore::new(vec![optional("A", "a"), required("B", "b")]);

    let step = core.step(fail(1));
    assert_eq!(step.next, CoreCommand::RunStep { index: 1 });
    let record = step.classified.expect("A classified");
    assert!(!record.required);
    assert_eq!(record.stderr_excerpt.as_deref(), Some("error output"));
}

#[test]
fn failed_precheck_classifies_without_running_the_step() {
    let mut core = PipelineCore::new(vec![
        optional("A", "a build").with_precheck(invocation("a --version")),
        required("B", "b"),
    ]);

    let step = core.step(CoreEvent::PrecheckCompleted(ExecutionResult::not_found("a")));
    assert_eq!(step.next, CoreCommand::RunStep { index: 1 });
    assert_eq!(
        step.classified.map(|r| r.verdict),
        Some(StepVerdict::Failed(FailureKind::PrecheckFailed(127)))
    );
}

#[test]
fn passed_precheck_asks_for_the_step() {
    let mut core =
        PipelineCore::new(vec![required("A", "a build").with_precheck(invocation("a --version"))]);

    let step = core.step(CoreEvent::PrecheckCompleted(ExecutionResult::success("a 1.0")));
    assert!(step.classified.is_none());
    assert_eq!(step.next, CoreCommand::RunStep { index: 0 });
}

#[test]
fn mismatched_event_is_ignored() {
    let mut core = PipelineCore::new(vec![required("A", "a")]);

    let step = core.step(CoreEvent::ContinueDecision(true));
    assert!(step.classified.is_none());
    assert_eq!(step.next, CoreCommand::RunStep { index: 0 });
    assert!(core.outcome().records().is_empty());
}

#[test]
fn long_stderr_is_truncated() {
    let mut core = PipelineCore::new(vec![optional("A", "a")]);
    let stderr = "x".repeat(500);

    let step = core.step(CoreEvent::StepCompleted(ExecutionResult::completed(1, "", stderr)));
    let excerpt = step.classified.and_then(|r| r.stderr_excerpt).expect("excerpt");
    assert_eq!(excerpt.chars().count(), 203);
    assert!(excerpt.ends_with("..."));
}

#[test]
fn verdict_classification() {
    assert_eq!(verdict_for(&ExecutionResult::success("")), StepVerdict::Succeeded);
    assert_eq!(
        verdict_for(&ExecutionResult::completed(2, "", "")),
        StepVerdict::Failed(FailureKind::ExitCode(2))
    );
    assert_eq!(
        verdict_for(&ExecutionResult::timed_out(Duration::from_secs(1))),
        StepVerdict::Failed(FailureKind::TimedOut)
    );
    assert_eq!(
        verdict_for(&ExecutionResult::not_found("nope")),
        StepVerdict::Failed(FailureKind::ToolMissing)
    );
}
