//! Child process execution shared by shell and command probes.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, Command};
use tokio::time;
use tokio_util::sync::CancellationToken;

use super::{Outcome, ProbeFault};

/// Longest stderr excerpt carried into an outcome detail.
const MAX_STDERR_EXCERPT: usize = 256;

/// Bytes of stderr kept while the child runs; only the tail is retained.
const STDERR_TAIL: usize = 4096;

/// How long to keep reading stderr once the child has exited. Descendants
/// may still hold the pipe open.
const STDERR_DRAIN: Duration = Duration::from_millis(50);

enum Exit {
    Status(io::Result<ExitStatus>),
    TimedOut,
    Cancelled,
}

/// Spawn `command` and map its exit status to an outcome.
///
/// The verdict follows the exit of the direct child, not the end of its
/// output. On unix the child leads its own process group, and the whole
/// group is killed when the deadline passes or `cancel` fires.
pub(crate) async fn run(
    mut command: Command,
    program: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Outcome {
    let started = Instant::now();

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let fault = ProbeFault::NotFound {
                program: program.to_string(),
            };
            return Outcome::from_fault(fault, started.elapsed());
        }
        Err(source) => {
            let fault = ProbeFault::Spawn {
                program: program.to_string(),
                source,
            };
            return Outcome::from_fault(fault, started.elapsed());
        }
    };

    let mut stderr = child.stderr.take();
    let mut tail = Vec::new();
    let mut chunk = [0u8; 1024];
    let deadline = time::sleep(timeout);
    tokio::pin!(deadline);

    let exit = loop {
        tokio::select! {
            status = child.wait() => break Exit::Status(status),
            read = read_chunk(stderr.as_mut(), &mut chunk), if stderr.is_some() => match read {
                Some(n) => push_tail(&mut tail, &chunk[..n]),
                None => stderr = None,
            },
            _ = &mut deadline => break Exit::TimedOut,
            _ = cancel.cancelled() => break Exit::Cancelled,
        }
    };

    let status = match exit {
        Exit::Status(status) => status,
        Exit::TimedOut => {
            terminate(&mut child);
            return Outcome::from_fault(ProbeFault::TimedOut(timeout), started.elapsed());
        }
        Exit::Cancelled => {
            terminate(&mut child);
            return Outcome::from_fault(ProbeFault::Cancelled, started.elapsed());
        }
    };

    let elapsed = started.elapsed();
    match status {
        Ok(status) if status.success() => Outcome::healthy("exit status 0", elapsed),
        Ok(status) => {
            if let Some(pipe) = stderr.as_mut() {
                let _ = time::timeout(STDERR_DRAIN, drain(pipe, &mut tail)).await;
            }
            let mut detail = describe_status(status);
            if let Some(line) = last_line(&tail) {
                detail.push_str(": ");
                detail.push_str(&line);
            }
            Outcome::unhealthy(detail, elapsed)
        }
        Err(e) => Outcome::from_fault(ProbeFault::Wait(e), elapsed),
    }
}

/// Read one chunk; `None` on EOF or error.
async fn read_chunk(pipe: Option<&mut ChildStderr>, chunk: &mut [u8]) -> Option<usize> {
    match pipe?.read(chunk).await {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

async fn drain(pipe: &mut ChildStderr, tail: &mut Vec<u8>) {
    let mut chunk = [0u8; 1024];
    while let Some(n) = read_chunk(Some(&mut *pipe), &mut chunk).await {
        push_tail(tail, &chunk[..n]);
    }
}

fn push_tail(tail: &mut Vec<u8>, bytes: &[u8]) {
    tail.extend_from_slice(bytes);
    if tail.len() > STDERR_TAIL {
        let excess = tail.len() - STDERR_TAIL;
        tail.drain(..excess);
    }
}

/// Kill the child and, on unix, every process in its group.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::errno::Errno;
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => tracing::warn!(pid, error = %e, "Failed to kill process group"),
        }
    }
    if let Err(e) = child.start_kill() {
        tracing::debug!(error = %e, "Child already gone");
    }
}

fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit status {code}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("killed by signal {signal}");
        }
    }
    "terminated without exit status".to_string()
}

/// Last non-empty stderr line, truncated.
fn last_line(stderr: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(stderr);
    let line = text.lines().rev().map(str::trim).find(|l| !l.is_empty())?;
    Some(line.chars().take(MAX_STDERR_EXCERPT).collect())
}
