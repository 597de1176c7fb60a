//! Line loop feeding the interpreter.

use std::io::{BufRead, Write};

use devsh_platform::RunLoop;
use devsh_terminal::Interpreter;

/// Counters for one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub handled: usize,
    pub unhandled: usize,
    pub failed: usize,
}

/// Feed lines from `input` until it is exhausted or the run loop stops.
///
/// `prompt` is written to `out` before every line when present. An error out
/// of the interpreter is logged and the loop moves on to the next line.
pub fn run<R: BufRead, W: Write>(
    interp: &Interpreter<'_>,
    run_loop: &dyn RunLoop,
    input: R,
    mut out: W,
    prompt: Option<&str>,
) -> std::io::Result<Summary> {
    let mut summary = Summary::default();
    let mut lines = input.lines();
    while run_loop.is_running() {
        if let Some(prompt) = prompt {
            write!(out, "{prompt}")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match interp.interpret(&line) {
            Ok(true) => summary.handled += 1,
            Ok(false) => {
                log::debug!("not handled: {line}");
                summary.unhandled += 1;
            },
            Err(e) if e.is_recoverable() => {
                log::warn!("{}: {e}", line.trim());
                summary.unhandled += 1;
            },
            Err(e) => {
                log::error!("{}: {e}", line.trim());
                summary.failed += 1;
            },
        }
    }
    Ok(summary)
}
