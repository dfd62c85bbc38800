//! External command execution.
//!
//! Runs a command with both output streams piped. Each stream is drained by
//! its own thread, line by line, echoing every line to the console as it
//! arrives and keeping a private copy. The call returns only after the
//! process has exited and both readers have finished, so nothing written
//! just before exit is lost and a child blocked on one full pipe can never
//! stall the other.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use tracing::{debug, info};

use crate::error::{ProcessError, Result};

/// Where echoed lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Runs external commands and captures their combined output.
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    echo: bool,
}

impl Default for Runner {
    fn default() -> Self {
        Self { echo: true }
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner that captures without echoing.
    pub fn quiet() -> Self {
        Self { echo: false }
    }

    /// Run `cmd` to completion.
    ///
    /// Returns stdout's lines followed by stderr's lines.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::Spawn` if the command cannot be started,
    /// `ProcessError::Failed` if it exits non-zero, and
    /// `ProcessError::Capture` if an output stream could not be read. The
    /// latter two carry whatever output was captured.
    pub fn run(&self, cmd: &mut Command) -> Result<Vec<u8>> {
        let command = describe(cmd);
        info!("running command: {}", command);

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                command: command.clone(),
                source,
            })?;

        let echo = self.echo;
        let stdout_handle = child
            .stdout
            .take()
            .map(|pipe| thread::spawn(move || drain(pipe, Stream::Stdout, echo)));
        let stderr_handle = child
            .stderr
            .take()
            .map(|pipe| thread::spawn(move || drain(pipe, Stream::Stderr, echo)));

        let status = child.wait();

        let mut output = Vec::new();
        let mut capture_errors = Vec::new();
        for (label, handle) in [("stdout", stdout_handle), ("stderr", stderr_handle)] {
            let Some(handle) = handle else { continue };
            match handle.join() {
                Ok(Ok(buf)) => output.extend_from_slice(&buf),
                Ok(Err(e)) => capture_errors.push(format!("{label} read failed: {e}")),
                Err(_) => capture_errors.push(format!("{label} reader panicked")),
            }
        }

        let output = finish(command, status, output, capture_errors)?;
        debug!(bytes = output.len(), "command finished");
        Ok(output)
    }
}

/// Turn the wait result and the readers' results into the call's outcome.
///
/// Whatever was captured is attached to every error.
fn finish(
    command: String,
    status: io::Result<ExitStatus>,
    output: Vec<u8>,
    capture_errors: Vec<String>,
) -> Result<Vec<u8>> {
    let status = match status {
        Ok(status) => status,
        Err(e) => {
            return Err(ProcessError::Capture {
                command,
                reason: e.to_string(),
                output,
            }
            .into())
        }
    };

    // A failed exit is reported as such even when a reader also failed.
    if !status.success() {
        return Err(ProcessError::Failed {
            command,
            status,
            output,
        }
        .into());
    }

    if !capture_errors.is_empty() {
        return Err(ProcessError::Capture {
            command,
            reason: capture_errors.join("; "),
            output,
        }
        .into());
    }

    Ok(output)
}

/// Read `pipe` to EOF, echoing and buffering each line.
///
/// Lines are kept byte-for-byte; a final line without a newline gets one.
fn drain<R: Read>(pipe: R, stream: Stream, echo: bool) -> io::Result<Vec<u8>> {
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(buf);
        }
        if !line.ends_with(b"\n") {
            line.push(b'\n');
        }
        if echo {
            echo_line(stream, &line);
        }
        buf.extend_from_slice(&line);
    }
}

fn echo_line(stream: Stream, line: &[u8]) {
    // Console echo is best effort; a closed terminal must not fail the command.
    let _ = match stream {
        Stream::Stdout => io::stdout().lock().write_all(line),
        Stream::Stderr => io::stderr().lock().write_all(line),
    };
}

/// Program and arguments joined by spaces, for logs and errors.
pub fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
