// tests/pipeline_properties.rs

mod common;
use crate::common::builders::{invocation, optional, required};

use std::collections::HashSet;

use proptest::prelude::*;
use stepgate::engine::{CoreCommand, CoreEvent, PipelineCore};
use stepgate::exec::ExecutionResult;
use stepgate::pipeline::{RunOutcome, StepDescriptor};

/// One generated step: (required, has precheck, precheck passes, step passes).
type StepShape = (bool, bool, bool, bool);

fn pipeline_strategy(max_steps: usize) -> impl Strategy<Value = Vec<StepShape>> {
    proptest::collection::vec(
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
        0..=max_steps,
    )
}

fn build(shapes: &[StepShape]) -> Vec<StepDescriptor> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, (req, has_precheck, _, _))| {
            let name = format!("step_{i}");
            let cmd = format!("tool_{i} run");
            let step = if *req {
                required(&name, &cmd)
            } else {
                optional(&name, &cmd)
            };
            if *has_precheck {
                step.with_precheck(invocation(&format!("tool_{i} --version")))
            } else {
                step
            }
        })
        .collect()
}

fn result(pass: bool) -> ExecutionResult {
    if pass {
        ExecutionResult::success("")
    } else {
        ExecutionResult::completed(1, "", "failed")
    }
}

/// Drive the core to completion, answering every continuation with
/// `answer`. Returns the outcome and the number of questions asked.
fn simulate(shapes: &[StepShape], answer: bool) -> (RunOutcome, usize) {
    let mut core = PipelineCore::new(build(shapes));
    let mut questions = 0;
    let mut guard = 0;

    loop {
        guard += 1;
        assert!(guard < 1000, "core did not terminate");

        let event = match core.next_command() {
            CoreCommand::Finished => break,
            CoreCommand::RunPrecheck { index } => CoreEvent::PrecheckCompleted(result(shapes[index].2)),
            CoreCommand::RunStep { index } => CoreEvent::StepCompleted(result(shapes[index].3)),
            CoreCommand::AskToContinue { index } => {
                assert!(shapes[index].0, "optional step prompted");
                questions += 1;
                CoreEvent::ContinueDecision(answer)
            }
        };
        core.step(event);
    }

    (core.finish(), questions)
}

fn step_passes(shape: &StepShape) -> bool {
    let (_, has_precheck, precheck_ok, step_ok) = *shape;
    (!has_precheck || precheck_ok) && step_ok
}

proptest! {
    #[test]
    fn every_step_lands_in_exactly_one_category(
        shapes in pipeline_strategy(12),
        answer in any::<bool>(),
    ) {
        let (outcome, _) = simulate(&shapes, answer);

        let mut seen = HashSet::new();
        for name in outcome
            .successful()
            .iter()
            .chain(outcome.failed())
            .chain(outcome.skipped())
            .chain(outcome.unattempted())
        {
            prop_assert!(seen.insert(name.clone()), "{} classified twice", name);
        }
        prop_assert_eq!(seen.len(), shapes.len());
    }

    #[test]
    fn accepting_every_prompt_attempts_every_step(shapes in pipeline_strategy(12)) {
        let (outcome, questions) = simulate(&shapes, true);

        let expected_failures = shapes.iter().filter(|s| !step_passes(s)).count();
        let required_failures = shapes.iter().filter(|s| s.0 && !step_passes(s)).count();

        prop_assert_eq!(outcome.failed().len(), expected_failures);
        prop_assert_eq!(outcome.successful().len(), shapes.len() - expected_failures);
        prop_assert_eq!(questions, required_failures);
        prop_assert!(outcome.unattempted().is_empty());
        prop_assert!(!outcome.is_halted());
    }

    #[test]
    fn declining_halts_at_first_required_failure(shapes in pipeline_strategy(12)) {
        let (outcome, questions) = simulate(&shapes, false);

        match shapes.iter().position(|s| s.0 && !step_passes(s)) {
            Some(first) => {
                let halted_at = format!("step_{first}");
                prop_assert_eq!(questions, 1);
                prop_assert_eq!(outcome.halted_at(), Some(halted_at.as_str()));
                prop_assert_eq!(outcome.unattempted().len(), shapes.len() - first - 1);
                prop_assert_eq!(outcome.records().len(), first + 1);
            }
            None => {
                prop_assert_eq!(questions, 0);
                prop_assert!(!outcome.is_halted());
                prop_assert_eq!(outcome.records().len(), shapes.len());
            }
        }
    }

    #[test]
    fn records_follow_declaration_order(shapes in pipeline_strategy(12)) {
        let (outcome, _) = simulate(&shapes, true);

        let recorded: Vec<String> = outcome.records().iter().map(|r| r.name.clone()).collect();
        let declared: Vec<String> = (0..shapes.len()).map(|i| format!("step_{i}")).collect();
        prop_assert_eq!(recorded, declared);
    }
}
