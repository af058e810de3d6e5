// src/exec/command.rs

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::pipeline::Invocation;

use super::backend::{ABNORMAL_EXIT_CODE, ExecutionResult, ProcessRunner};

/// Real process runner built on `tokio::process::Command`.
///
/// Children inherit the caller's environment and, unless a working directory
/// is configured, its current directory. Stdin is closed so a step can never
/// block waiting for input that will not come.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    working_dir: Option<PathBuf>,
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every child in `dir` instead of the current directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl ProcessRunner for TokioProcessRunner {
    fn execute<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>> {
        Box::pin(run_invocation(invocation, self.working_dir.as_deref(), timeout))
    }
}

/// Spawn `invocation`, wait for it (bounded by `timeout`) and collect its
/// output. Every fault is folded into the returned `ExecutionResult`.
async fn run_invocation(
    invocation: &Invocation,
    working_dir: Option<&Path>,
    timeout: Duration,
) -> ExecutionResult {
    let started = Instant::now();

    debug!(cmd = %invocation, timeout_secs = timeout.as_secs_f64(), "spawning process");

    let mut cmd = Command::new(invocation.program());
    cmd.args(invocation.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(cmd = %invocation, "executable not found");
            return ExecutionResult::not_found(invocation.program())
                .with_duration(started.elapsed());
        }
        Err(e) => {
            error!(cmd = %invocation, error = %e, "failed to spawn process");
            return abnormal(invocation, &e, started);
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Wait for exit and drain both pipes concurrently so a chatty child can
    // never fill a pipe buffer and stall.
    let waited = tokio::time::timeout(timeout, async {
        let (status, out, err) = tokio::join!(child.wait(), drain(stdout), drain(stderr));
        status.map(|status| (status, out, err))
    })
    .await;

    match waited {
        Ok(Ok((status, out, err))) => {
            let exit_code = status.code().unwrap_or(ABNORMAL_EXIT_CODE);
            info!(
                cmd = %invocation,
                exit_code,
                success = status.success(),
                "process exited"
            );
            ExecutionResult::completed(
                exit_code,
                String::from_utf8_lossy(&out),
                String::from_utf8_lossy(&err),
            )
            .with_duration(started.elapsed())
        }
        Ok(Err(e)) => {
            error!(cmd = %invocation, error = %e, "failed waiting for process");
            abnormal(invocation, &e, started)
        }
        Err(_elapsed) => {
            warn!(
                cmd = %invocation,
                timeout_secs = timeout.as_secs_f64(),
                "process timed out; killing"
            );
            // `kill` also waits for the child, so it is reaped before we return.
            if let Err(e) = child.kill().await {
                warn!(cmd = %invocation, error = %e, "failed to kill timed-out process");
            }
            ExecutionResult::timed_out(timeout)
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(stream: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        if let Err(e) = stream.read_to_end(&mut buf).await {
            debug!(error = %e, "error reading child output; keeping partial output");
        }
    }
    buf
}

fn abnormal(invocation: &Invocation, e: &io::Error, started: Instant) -> ExecutionResult {
    ExecutionResult::completed(
        ABNORMAL_EXIT_CODE,
        "",
        format!("failed to run '{invocation}': {e}"),
    )
    .with_duration(started.elapsed())
}
