//! Helpers for running child processes: bounded capture and live relay.

use std::io::{Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

const CHUNK_BYTES: usize = 8192;

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

/// Run a command with a timeout and capture stdout/stderr without risking pipe deadlocks.
///
/// `stdin` is written on its own thread and then closed, while stdout/stderr are drained
/// concurrently. `output_limit_bytes` bounds the amount of each stream kept in memory
/// (bytes beyond this are discarded while still draining the pipe).
#[instrument(skip_all, fields(timeout_secs = timeout.as_secs(), output_limit_bytes))]
pub fn run_command_with_timeout(
    mut cmd: Command,
    stdin: Option<&[u8]>,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<CommandOutput> {
    let mut child = spawn_piped(&mut cmd, stdin.is_some())?;
    let (child_stdin, stdout, stderr) = take_pipes(&mut child)?;

    thread::scope(|scope| -> Result<CommandOutput> {
        let stdin_handle = scope.spawn(move || feed_stdin(child_stdin, stdin));
        let stdout_handle = scope.spawn(move || read_stream_limited(stdout, output_limit_bytes));
        let stderr_handle = scope.spawn(move || read_stream_limited(stderr, output_limit_bytes));

        let mut timed_out = false;
        let status = match child.wait_timeout(timeout).context("wait for command")? {
            Some(status) => status,
            None => {
                warn!(
                    timeout_secs = timeout.as_secs(),
                    "command timed out, killing"
                );
                timed_out = true;
                child.kill().context("kill command")?;
                child.wait().context("wait command after kill")?
            }
        };

        join_thread(stdin_handle, "stdin writer")?;
        let (stdout, stdout_truncated) = join_thread(stdout_handle, "stdout reader")??;
        let (stderr, stderr_truncated) = join_thread(stderr_handle, "stderr reader")??;

        if stdout_truncated > 0 || stderr_truncated > 0 {
            warn!(stdout_truncated, stderr_truncated, "output truncated");
        }

        debug!(exit_code = ?status.code(), timed_out, "command finished");
        Ok(CommandOutput {
            status,
            stdout,
            stderr,
            stdout_truncated,
            stderr_truncated,
            timed_out,
        })
    })
}

/// Run a command, forwarding its stdout/stderr to `out`/`err` as bytes arrive.
///
/// `stdin`, if given, is written and then closed; otherwise the child's stdin is
/// closed immediately. Each stream is copied on its own thread, so ordering is
/// preserved within a stream but not across the two. There is no timeout: this
/// returns when the child exits and both streams reach EOF.
#[instrument(skip_all, fields(stdin_bytes = stdin.map_or(0, |input| input.len())))]
pub fn run_command_relay<O, E>(
    mut cmd: Command,
    stdin: Option<&[u8]>,
    out: &mut O,
    err: &mut E,
) -> Result<ExitStatus>
where
    O: Write + Send,
    E: Write + Send,
{
    let mut child = spawn_piped(&mut cmd, stdin.is_some())?;
    let (child_stdin, stdout, stderr) = take_pipes(&mut child)?;

    thread::scope(|scope| -> Result<ExitStatus> {
        let stdout_handle = scope.spawn(move || relay_stream(stdout, out));
        let stderr_handle = scope.spawn(move || relay_stream(stderr, err));

        feed_stdin(child_stdin, stdin);
        let status = child.wait().context("wait for command")?;

        let stdout_bytes = join_thread(stdout_handle, "stdout relay")?.context("relay stdout")?;
        let stderr_bytes = join_thread(stderr_handle, "stderr relay")?.context("relay stderr")?;

        debug!(
            exit_code = ?status.code(),
            stdout_bytes,
            stderr_bytes,
            "command finished"
        );
        Ok(status)
    })
}

fn spawn_piped(cmd: &mut Command, pipe_stdin: bool) -> Result<Child> {
    if pipe_stdin {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    debug!(program = ?cmd.get_program(), "spawning child process");
    match cmd.spawn() {
        Ok(child) => Ok(child),
        Err(e) => {
            error!(err = %e, program = ?cmd.get_program(), "failed to spawn command");
            Err(e).with_context(|| format!("spawn {}", cmd.get_program().to_string_lossy()))
        }
    }
}

type Pipes = (
    Option<ChildStdin>,
    std::process::ChildStdout,
    std::process::ChildStderr,
);

fn take_pipes(child: &mut Child) -> Result<Pipes> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    Ok((child.stdin.take(), stdout, stderr))
}

/// Write `input` to the child and close its stdin.
///
/// A child that exits without reading all of its input surfaces as a broken
/// pipe; that is logged, and the exit status is left to speak for the child.
fn feed_stdin(child_stdin: Option<ChildStdin>, input: Option<&[u8]>) {
    let (Some(mut child_stdin), Some(input)) = (child_stdin, input) else {
        return;
    };
    if let Err(e) = child_stdin.write_all(input) {
        warn!(err = %e, "failed to write child stdin");
    }
}

fn join_thread<T>(handle: thread::ScopedJoinHandle<'_, T>, label: &str) -> Result<T> {
    handle
        .join()
        .map_err(|_| anyhow!("{label} thread panicked"))
}

/// Copy `reader` to `writer` until EOF, returning the bytes forwarded.
///
/// If the writer's other end has gone away (`BrokenPipe`), forwarding stops but
/// the child's pipe is still drained so the child never blocks on a full pipe.
fn relay_stream<R: Read, W: Write>(mut reader: R, writer: &mut W) -> Result<u64> {
    let mut chunk = [0u8; CHUNK_BYTES];
    let mut total = 0u64;
    let mut forwarding = true;
    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        if !forwarding {
            continue;
        }
        match writer.write_all(&chunk[..n]).and_then(|()| writer.flush()) {
            Ok(()) => total += n as u64,
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!(forwarded = total, "output closed, discarding the rest");
                forwarding = false;
            }
            Err(e) => return Err(e).context("forward output"),
        }
    }
    Ok(total)
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; CHUNK_BYTES];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}
