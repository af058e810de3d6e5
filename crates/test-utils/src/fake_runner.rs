use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use stepgate::exec::{ExecutionResult, ProcessRunner};
use stepgate::pipeline::Invocation;

/// A fake runner that:
/// - records every invocation it was asked to run (as its display string)
/// - returns a scripted result per invocation, or exit code 0 otherwise.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    scripted: HashMap<String, ExecutionResult>,
    calls: Vec<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result for `invocation` (e.g. `"cargo build"`).
    pub fn respond(mut self, invocation: &str, result: ExecutionResult) -> Self {
        self.scripted.insert(invocation.to_string(), result);
        self
    }

    /// `invocation` exits with `code` and writes `stderr`.
    pub fn exit_with(self, invocation: &str, code: i32, stderr: &str) -> Self {
        self.respond(invocation, ExecutionResult::completed(code, "", stderr))
    }

    /// `invocation`'s executable cannot be found.
    pub fn missing(self, invocation: &str) -> Self {
        let program = invocation.split_whitespace().next().unwrap_or(invocation);
        self.respond(invocation, ExecutionResult::not_found(program))
    }

    /// `invocation` hangs past its timeout.
    pub fn hangs(self, invocation: &str) -> Self {
        self.respond(invocation, ExecutionResult::timed_out(Duration::from_secs(300)))
    }

    /// Every invocation requested so far, in order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }
}

impl ProcessRunner for FakeRunner {
    fn execute<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>> {
        let key = invocation.to_string();
        let result = self
            .scripted
            .get(&key)
            .cloned()
            .unwrap_or_else(|| ExecutionResult::success(format!("{key} ok")));
        self.calls.push(key);

        Box::pin(async move { result })
    }
}
