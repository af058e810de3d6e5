// src/report/prompt.rs

//! Yes/no prompting.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::types::NonInteractivePolicy;

/// How a terminal answers `confirm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Ask on the terminal and read the reply from stdin.
    Interactive,
    /// Never ask; answer from a fixed policy.
    Fixed(NonInteractivePolicy),
}

impl PromptMode {
    /// Resolve a prompt, writing the question (and, in fixed mode, the
    /// chosen answer) to `out`.
    pub fn confirm<W: Write>(&self, out: &mut W, message: &str, default: bool) -> Result<bool> {
        match self {
            PromptMode::Interactive => {
                let stdin = io::stdin();
                let mut input = stdin.lock();
                ask(&mut input, out, message, default)
            }
            PromptMode::Fixed(policy) => {
                // The policy decides; a failed echo must not turn into the
                // interactive default.
                let answer = policy.answer(default);
                if let Err(e) = writeln!(out, "{message} {} (non-interactive)", yes_no(answer)) {
                    warn!(%message, error = %e, "failed to echo non-interactive answer");
                }
                debug!(%message, answer, ?policy, "prompt answered by policy");
                Ok(answer)
            }
        }
    }
}

/// Write `message` with a `(Y/n)` / `(y/N)` marker and read one line.
///
/// End of input is answered with `default`.
pub fn ask<R, W>(input: &mut R, out: &mut W, message: &str, default: bool) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    let marker = if default { "(Y/n)" } else { "(y/N)" };
    write!(out, "{message} {marker}: ").context("writing prompt")?;
    out.flush().context("flushing prompt")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("reading prompt reply")?;
    if read == 0 {
        warn!(%message, default, "no reply on stdin; using default answer");
        writeln!(out).context("writing prompt")?;
        return Ok(default);
    }

    Ok(parse_answer(&line, default))
}

/// `y`/`yes` and `n`/`no` (any case) decide; anything else takes `default`.
pub fn parse_answer(reply: &str, default: bool) -> bool {
    match reply.trim().to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}

fn yes_no(answer: bool) -> &'static str {
    if answer { "yes" } else { "no" }
}
