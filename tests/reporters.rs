// tests/reporters.rs

mod common;
use crate::common::builders::{gate, optional, required};
use crate::common::init_tracing;

use std::io::Cursor;

use stepgate::engine::{Orchestrator, OrchestratorOptions};
use stepgate::exit_codes;
use stepgate::gate::PrerequisiteGate;
use stepgate::pipeline::StepDescriptor;
use stepgate::report::prompt::ask;
use stepgate::report::{PlainTerminal, PromptMode, RichTerminal, Terminal, parse_answer};
use stepgate::types::NonInteractivePolicy;
use stepgate_test_utils::FakeRunner;

/// Run `steps` through the orchestrator with `terminal` and return what was
/// written plus the exit status.
async fn render<T, F>(
    terminal: T,
    runner: FakeRunner,
    gate: &PrerequisiteGate,
    steps: Vec<StepDescriptor>,
    into_writer: F,
) -> (String, i32)
where
    T: Terminal,
    F: FnOnce(T) -> Vec<u8>,
{
    let mut orchestrator = Orchestrator::new(runner, terminal, OrchestratorOptions::default());
    let result = orchestrator.run(gate, steps).await;
    let code = stepgate::conclude(&mut orchestrator, &result);
    let (_, terminal) = orchestrator.into_parts();
    let bytes = into_writer(terminal);
    (String::from_utf8(bytes).expect("utf-8 output"), code)
}

fn plain(policy: NonInteractivePolicy) -> PlainTerminal<Vec<u8>> {
    PlainTerminal::new(Vec::new(), PromptMode::Fixed(policy))
}

fn rich(policy: NonInteractivePolicy) -> RichTerminal<Vec<u8>> {
    RichTerminal::new(Vec::new(), PromptMode::Fixed(policy))
}

#[tokio::test]
async fn plain_success_run_lists_progress_and_next_steps() {
    init_tracing();

    let terminal = plain(NonInteractivePolicy::AcceptAll)
        .with_next_steps(vec!["Run `cargo test`".to_string()]);
    let runner = FakeRunner::new().respond(
        "git --version",
        stepgate::exec::ExecutionResult::success("git version 2.43.0\n"),
    );
    let steps = vec![required("Fetch", "cargo fetch"), optional("Build", "cargo build")];

    let (out, code) = render(terminal, runner, &gate(&["git"]), steps, |t| t.into_writer()).await;

    assert_eq!(code, exit_codes::SUCCESS);
    assert!(out.contains("PROJECT INSTALLATION & BUILD"));
    assert!(out.contains("  [ok] git: git version 2.43.0"));
    assert!(out.contains("Continue with installation? yes (non-interactive)"));
    assert!(out.contains("Step 1/2: Fetch"));
    assert!(out.contains("Step 2/2: Build"));
    assert!(out.contains("[ok] Fetch completed successfully"));
    assert!(out.contains("   Output: cargo fetch ok"));
    assert!(out.contains("Successful: 2"));
    assert!(out.contains("Failed: 0"));
    assert!(out.contains("Started: 20"));
    assert!(out.contains("All installations completed successfully!"));
    assert!(out.contains("  * Run `cargo test`"));
    assert!(!out.contains('\x1b'), "plain output must not contain ANSI codes");
}

#[tokio::test]
async fn plain_halted_run_reports_failure_details() {
    init_tracing();

    let long_stderr = "e".repeat(400);
    let runner = FakeRunner::new().exit_with("cargo build", 101, &long_stderr);
    let steps = vec![
        required("Build", "cargo build").with_remediation_hint("Install Rust: https://rustup.rs/"),
        required("Nextest", "cargo install cargo-nextest"),
        optional("Watch", "cargo install cargo-watch"),
    ];

    let (out, code) = render(
        plain(NonInteractivePolicy::AbortOnRequiredFailure),
        runner,
        &PrerequisiteGate::empty(),
        steps,
        |t| t.into_writer(),
    )
    .await;

    assert_eq!(code, exit_codes::STEPS_FAILED);
    assert!(out.contains("[FAIL] Build failed (exit code 101)"));
    assert!(out.contains(&format!("   Error: {}...", "e".repeat(200))));
    assert!(!out.contains(&"e".repeat(201)));
    assert!(out.contains("   Hint: Install Rust: https://rustup.rs/"));
    assert!(out.contains("Critical failure in required component: Build"));
    assert!(out.contains("Continue despite this failure? no (non-interactive)"));
    assert!(out.contains("Not attempted: 2"));
    assert!(out.contains("  - Build (required): exit code 101"));
    assert!(out.contains("Halted after 'Build'. Not attempted: Nextest, Watch"));
    assert!(out.contains("Installation finished with 1 failures."));
    assert!(!out.contains("Step 2/3"));
}

#[tokio::test]
async fn plain_missing_prerequisite_message() {
    init_tracing();

    let runner = FakeRunner::new().missing("node --version");
    let (out, code) = render(
        plain(NonInteractivePolicy::AcceptAll),
        runner,
        &gate(&["node"]),
        vec![required("A", "true")],
        |t| t.into_writer(),
    )
    .await;

    assert_eq!(code, exit_codes::ENVIRONMENT_MISSING);
    assert!(out.contains("  [missing] node"));
    assert!(out.contains("Missing prerequisites: node"));
    assert!(!out.contains("INSTALLATION SUMMARY"));
}

#[tokio::test]
async fn rich_summary_table_truncates_successful_names() {
    init_tracing();

    let runner = FakeRunner::new().hangs("slow run");
    let steps = vec![
        required("One", "one"),
        required("Two", "two"),
        required("Three", "three"),
        required("Four", "four"),
        optional("Slow", "slow run"),
    ];

    let (out, code) = render(
        rich(NonInteractivePolicy::AcceptAll),
        runner,
        &PrerequisiteGate::empty(),
        steps,
        |t| t.into_writer(),
    )
    .await;

    assert_eq!(code, exit_codes::STEPS_FAILED);
    assert!(out.contains("Project Installation & Build"));
    assert!(out.contains("Installation Summary"));
    assert!(out.contains("One, Two, Three (+1 more)"));
    assert!(out.contains("Slow hung and was killed"));
    assert!(out.contains("Installation finished with 1 failures"));
    assert!(out.contains('\x1b'));
}

#[tokio::test]
async fn rich_success_celebrates() {
    init_tracing();

    let (out, code) = render(
        rich(NonInteractivePolicy::AcceptAll),
        FakeRunner::new(),
        &PrerequisiteGate::empty(),
        vec![required("A", "a")],
        |t| t.into_writer(),
    )
    .await;

    assert_eq!(code, exit_codes::SUCCESS);
    assert!(out.contains("All installations completed successfully!"));
    assert!(out.contains("✔ A completed successfully"));
}

#[test]
fn ask_reads_one_line_and_applies_default() {
    let mut out = Vec::new();
    let answer = ask(&mut Cursor::new("y\n"), &mut out, "Go?", false).unwrap();
    assert!(answer);
    assert_eq!(String::from_utf8(out).unwrap(), "Go? (y/N): ");

    let mut out = Vec::new();
    assert!(ask(&mut Cursor::new("\n"), &mut out, "Go?", true).unwrap());
    assert_eq!(String::from_utf8(out).unwrap(), "Go? (Y/n): ");

    let mut out = Vec::new();
    assert!(!ask(&mut Cursor::new("NO\n"), &mut out, "Go?", true).unwrap());
}

#[test]
fn ask_at_end_of_input_takes_default() {
    let mut out = Vec::new();
    assert!(!ask(&mut Cursor::new(""), &mut out, "Go?", false).unwrap());
    assert!(ask(&mut Cursor::new(""), &mut out, "Go?", true).unwrap());
}

#[test]
fn parse_answer_accepts_short_and_long_forms() {
    assert!(parse_answer("y", false));
    assert!(parse_answer(" Yes \n", false));
    assert!(!parse_answer("n", true));
    assert!(!parse_answer("no", true));
    assert!(parse_answer("maybe", true));
    assert!(!parse_answer("", false));
}

#[test]
fn fixed_prompt_answers_from_policy() {
    let mut out = Vec::new();
    let accept = PromptMode::Fixed(NonInteractivePolicy::AcceptAll);
    assert!(accept.confirm(&mut out, "Continue?", false).unwrap());

    let abort = PromptMode::Fixed(NonInteractivePolicy::AbortOnRequiredFailure);
    assert!(abort.confirm(&mut out, "Start?", true).unwrap());
    assert!(!abort.confirm(&mut out, "Continue?", false).unwrap());

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "Continue? yes (non-interactive)\nStart? yes (non-interactive)\nContinue? no (non-interactive)\n"
    );
}

/// A sink whose every write fails, like stdout after the reader went away.
struct ClosedSink;

impl std::io::Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }
}

#[test]
fn fixed_prompt_keeps_policy_answer_when_echo_fails() {
    let accept = PromptMode::Fixed(NonInteractivePolicy::AcceptAll);
    assert!(accept.confirm(&mut ClosedSink, "Continue?", false).unwrap());

    let abort = PromptMode::Fixed(NonInteractivePolicy::AbortOnRequiredFailure);
    assert!(abort.confirm(&mut ClosedSink, "Start?", true).unwrap());
    assert!(!abort.confirm(&mut ClosedSink, "Continue?", false).unwrap());
}

#[tokio::test]
async fn accept_all_continues_when_output_is_closed() {
    init_tracing();

    let runner = FakeRunner::new().exit_with("tool-a run", 1, "boom");
    let steps = vec![required("A", "tool-a run"), required("B", "tool-b run")];
    let terminal = PlainTerminal::new(
        ClosedSink,
        PromptMode::Fixed(NonInteractivePolicy::AcceptAll),
    );

    let mut orchestrator = Orchestrator::new(runner, terminal, OrchestratorOptions::default());
    let result = orchestrator.run(&PrerequisiteGate::empty(), steps).await;

    let outcome = result.outcome().expect("run completed");
    assert_eq!(outcome.failed(), ["A".to_string()]);
    assert_eq!(outcome.successful(), ["B".to_string()]);
    assert!(outcome.unattempted().is_empty());
    assert!(!outcome.is_halted());
    assert!(orchestrator.terminal_faults() > 0);

    assert_eq!(
        stepgate::conclude(&mut orchestrator, &result),
        exit_codes::STEPS_FAILED
    );
}
