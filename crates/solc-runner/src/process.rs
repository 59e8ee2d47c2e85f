//! Child process execution with concurrent pipe handling
//!
//! solc reads its whole input before producing most output, but it may also
//! start writing diagnostics early, and pipe buffers are bounded. Writing
//! stdin to completion before reading stdout/stderr can therefore deadlock.
//! [`ProcessRunner::execute`] drives four futures at once on the calling
//! task:
//!
//! 1. stdin writer: writes the payload, then closes the pipe
//! 2. stdout drain: reads to end of stream
//! 3. stderr drain: reads to end of stream
//! 4. exit wait
//!
//! All four are joined before returning, so no drain outlives the call and
//! captured output is complete when the exit status is reported.

use crate::command::CommandSpec;
use crate::error::{Result, SolcError};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Captured outcome of one child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the child was terminated by a signal
    pub status_code: Option<i32>,
    /// Everything written to stdout
    pub stdout: String,
    /// Everything written to stderr
    pub stderr: String,
}

impl ProcessOutput {
    /// True iff the child exited with code zero
    #[must_use]
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Spawns solc and exchanges data with it over pipes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    cancel: Option<CancellationToken>,
}

impl ProcessRunner {
    /// Runner without cancellation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that aborts when `token` is cancelled
    #[must_use]
    pub const fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
        }
    }

    /// Run `spec`, feeding `stdin` to the child.
    ///
    /// A non-zero exit is not an error; inspect [`ProcessOutput::success`].
    /// If the child exits without consuming all of `stdin`, the broken pipe
    /// is ignored and the exit status decides the outcome.
    ///
    /// On cancellation the child is killed and reaped before returning.
    /// Dropping the returned future also kills the child.
    ///
    /// # Errors
    ///
    /// - [`SolcError::ProcessStart`] if the executable cannot be spawned
    /// - [`SolcError::ExecutionInterrupted`] if the cancellation token fires
    /// - [`SolcError::StreamIo`] on pipe or wait failures
    #[tracing::instrument(
        name = "solc_execute",
        skip_all,
        fields(program = %spec.program_name(), stdin_bytes = stdin.len()),
        level = "debug"
    )]
    pub async fn execute(&self, spec: &CommandSpec, stdin: &[u8]) -> Result<ProcessOutput> {
        let program = spec.program_name();

        if self.is_cancelled() {
            warn!("Cancelled before spawning");
            return Err(SolcError::interrupted(program));
        }

        debug!(argv = ?spec.argv(), cwd = %spec.current_dir.display(), "Spawning solc");
        let start_time = Instant::now();

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.current_dir)
            .envs(spec.env.iter().map(|(key, value)| (key, value)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SolcError::process_start(&program, e))?;

        let stdin_pipe = child.stdin.take();
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let outcome = {
            let run = async {
                tokio::try_join!(
                    feed_stdin(stdin_pipe, stdin),
                    drain(stdout_pipe, "stdout"),
                    drain(stderr_pipe, "stderr"),
                    async {
                        child
                            .wait()
                            .await
                            .map_err(|e| SolcError::stream_io("wait", e))
                    },
                )
            };

            match &self.cancel {
                Some(token) => tokio::select! {
                    result = run => Some(result),
                    () = token.cancelled() => None,
                },
                None => Some(run.await),
            }
        };

        let Some(result) = outcome else {
            warn!("Cancelled while running, killing child");
            if let Err(e) = child.kill().await {
                debug!(error = %e, "Child already gone");
            }
            return Err(SolcError::interrupted(program));
        };

        let ((), stdout, stderr, status) = result?;
        let output = ProcessOutput {
            status_code: status.code(),
            stdout,
            stderr,
        };

        info!(
            duration_ms = start_time.elapsed().as_millis(),
            status_code = ?output.status_code,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "solc finished"
        );

        Ok(output)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// Write the whole payload, then drop the pipe to signal end of input.
async fn feed_stdin(pipe: Option<ChildStdin>, payload: &[u8]) -> Result<()> {
    let Some(mut pipe) = pipe else {
        return Ok(());
    };

    match pipe.write_all(payload).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            warn!(bytes = payload.len(), "solc closed stdin before reading all input");
        }
        Err(e) => return Err(SolcError::stream_io("stdin", e)),
    }

    drop(pipe);
    Ok(())
}

/// Read a pipe to end of stream, line by line.
///
/// Every line in the result ends with `\n`, including a final line the
/// child left unterminated. Only `\n` ends a line: `\r` bytes are kept as
/// written, so captured output matches what the child produced byte for
/// byte. Invalid UTF-8 is replaced.
async fn drain<R>(pipe: Option<R>, stream: &'static str) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(String::new());
    };

    let mut reader = BufReader::new(pipe);
    let mut content = Vec::new();
    loop {
        let read = reader
            .read_until(b'\n', &mut content)
            .await
            .map_err(|e| SolcError::stream_io(stream, e))?;
        if read == 0 {
            break;
        }
        if content.last() != Some(&b'\n') {
            content.push(b'\n');
        }
    }

    debug!(stream, bytes = content.len(), "Drained child stream");
    Ok(String::from_utf8(content)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}
