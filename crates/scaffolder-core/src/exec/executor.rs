//! Launch one external process, capture its output, settle exactly once

use super::options::{ErrorMode, HostPlatform};
use super::outcome::{ExecutionFailure, ExecutionRequest, ExecutionResult, SENTINEL_EXIT_CODE};
use crate::error::ExecError;
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, Write};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

/// Read size for draining child pipes
const CHUNK_SIZE: usize = 8 * 1024;

/// Something that can run an [`ExecutionRequest`].
///
/// The workflow is generic over this so it can be driven without spawning
/// real processes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, request: ExecutionRequest) -> Result<ExecutionResult, ExecError>;
}

#[async_trait]
impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    async fn run(&self, request: ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        (**self).run(request).await
    }
}

/// Runs requests as real OS processes via [`execute`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl CommandRunner for ProcessExecutor {
    async fn run(&self, request: ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        execute(&request).await
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn echo(self, chunk: &[u8]) {
        match self {
            Stream::Stdout => self.mirror(&mut io::stdout().lock(), chunk),
            Stream::Stderr => self.mirror(&mut io::stderr().lock(), chunk),
        }
    }

    /// Echo is best effort; a closed terminal must not fail the command
    fn mirror<W: Write>(self, out: &mut W, chunk: &[u8]) {
        let _ = match self {
            Stream::Stdout => out.write_all(chunk),
            Stream::Stderr => write!(out, "{}", String::from_utf8_lossy(chunk).yellow()),
        };
        let _ = out.flush();
    }
}

/// Run `request` to completion.
///
/// Output pipes are drained concurrently with waiting on the child, so a chatty
/// process never blocks on a full pipe. There is no timeout and the child is
/// never killed.
///
/// With [`ErrorMode::Reject`], spawn errors and non-zero exits are returned as
/// `Err`. With [`ErrorMode::Resolve`], every outcome is `Ok` and the caller
/// inspects `exit_code` (`-1` when the process could not run).
pub async fn execute(request: &ExecutionRequest) -> Result<ExecutionResult, ExecError> {
    let started = Instant::now();
    let echo = request.options.echo_output;

    debug!(
        command = %request.command_line(),
        cwd = %request.working_directory.display(),
        "Spawning process"
    );

    let spawned = if request.command.trim().is_empty() {
        Err(io::Error::new(io::ErrorKind::InvalidInput, "empty command"))
    } else {
        build_command(request, HostPlatform::current()).spawn()
    };

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => return settle_error(request, started, Vec::new(), Vec::new(), e),
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let ((stdout, stdout_err), (stderr, stderr_err), status) = tokio::join!(
        drain(stdout, Stream::Stdout, echo),
        drain(stderr, Stream::Stderr, echo),
        child.wait(),
    );

    let status = match status {
        Ok(status) => status,
        Err(e) => return settle_error(request, started, stdout, stderr, e),
    };

    if let Some(e) = stdout_err.or(stderr_err) {
        return settle_error(request, started, stdout, stderr, e);
    }

    // No code means the child was terminated by a signal
    let code = status.code().unwrap_or(SENTINEL_EXIT_CODE);
    settle_exit(request, started, stdout, stderr, code)
}

fn build_command(request: &ExecutionRequest, platform: HostPlatform) -> Command {
    let options = &request.options;

    let mut cmd = if options.resolve_shell(&request.command, platform) {
        let line = request.command_line();
        if platform.is_windows() {
            let mut cmd = Command::new("cmd");
            cmd.args(["/d", "/s", "/c"]).arg(line);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(line);
            cmd
        }
    } else {
        let mut cmd = Command::new(&request.command);
        cmd.args(&request.arguments);
        cmd
    };

    cmd.current_dir(&request.working_directory)
        .env_clear()
        .envs(options.environment.iter())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    cmd
}

/// Read `reader` to EOF, keeping whatever arrived before an error
async fn drain<R>(reader: Option<R>, stream: Stream, echo: bool) -> (Vec<u8>, Option<io::Error>)
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let Some(mut reader) = reader else {
        return (buffer, None);
    };

    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => return (buffer, None),
            Ok(n) => {
                if echo {
                    stream.echo(&chunk[..n]);
                }
                buffer.extend_from_slice(&chunk[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return (buffer, Some(e)),
        }
    }
}

fn failure(
    request: &ExecutionRequest,
    started: Instant,
    stdout: &[u8],
    stderr: &[u8],
    exit_code: i32,
) -> ExecutionFailure {
    ExecutionFailure {
        command: request.command.clone(),
        arguments: request.arguments.clone(),
        working_directory: request.working_directory.clone(),
        stdout: String::from_utf8_lossy(stdout).into_owned(),
        stderr: String::from_utf8_lossy(stderr).into_owned(),
        exit_code,
        elapsed: started.elapsed(),
    }
}

fn settle_error(
    request: &ExecutionRequest,
    started: Instant,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    error: io::Error,
) -> Result<ExecutionResult, ExecError> {
    let failure = failure(request, started, &stdout, &stderr, SENTINEL_EXIT_CODE);
    debug!(
        command = %failure.command_line(),
        elapsed_ms = failure.elapsed.as_millis() as u64,
        error = %error,
        "Process could not run"
    );

    match request.options.error_mode {
        ErrorMode::Reject => Err(ExecError::SpawnFailure {
            failure,
            source: error,
        }),
        ErrorMode::Resolve => Ok(ExecutionResult {
            exit_code: failure.exit_code,
            stdout: failure.stdout,
            stderr: failure.stderr,
            working_directory: failure.working_directory,
            elapsed: failure.elapsed,
            spawn_error: Some(error),
        }),
    }
}

fn settle_exit(
    request: &ExecutionRequest,
    started: Instant,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_code: i32,
) -> Result<ExecutionResult, ExecError> {
    let failure = failure(request, started, &stdout, &stderr, exit_code);
    debug!(
        command = %failure.command_line(),
        exit_code,
        elapsed_ms = failure.elapsed.as_millis() as u64,
        "Process exited"
    );

    if exit_code != 0 && request.options.error_mode == ErrorMode::Reject {
        return Err(ExecError::NonZeroExit { failure });
    }

    Ok(ExecutionResult {
        exit_code,
        stdout: failure.stdout,
        stderr: failure.stderr,
        working_directory: failure.working_directory,
        elapsed: failure.elapsed,
        spawn_error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::options::ExecutionOptions;

    #[test]
    fn test_build_command_without_shell_keeps_arguments() {
        let req = ExecutionRequest::new("git", ["clone", "--depth=1"], "/tmp");
        let cmd = build_command(&req, HostPlatform::Windows);
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "git");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, ["clone", "--depth=1"]);
    }

    #[test]
    fn test_build_command_wraps_in_cmd_on_windows() {
        let req = ExecutionRequest::new("npm", ["install"], "/tmp");
        let cmd = build_command(&req, HostPlatform::Windows);
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "cmd");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, ["/d", "/s", "/c", "npm install"]);
    }

    #[test]
    fn test_build_command_forced_shell_on_unix() {
        let req = ExecutionRequest::new("echo", ["hi"], "/tmp")
            .with_options(ExecutionOptions::default().use_shell(true));
        let cmd = build_command(&req, HostPlatform::Linux);
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "sh");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, ["-c", "echo hi"]);
    }

    #[test]
    fn test_mirror_copies_chunks() {
        let mut out = Vec::new();
        Stream::Stdout.mirror(&mut out, b"line one\n");
        Stream::Stdout.mirror(&mut out, b"line two\n");
        assert_eq!(out, b"line one\nline two\n");

        let mut err = Vec::new();
        Stream::Stderr.mirror(&mut err, b"careful");
        assert!(String::from_utf8(err).unwrap().contains("careful"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_mirror_ignores_closed_terminal() {
        Stream::Stdout.mirror(&mut BrokenPipe, b"out");
        Stream::Stderr.mirror(&mut BrokenPipe, b"err");
    }

    #[test]
    fn test_settle_exit_resolve_keeps_code() {
        let req = ExecutionRequest::new("x", Vec::<String>::new(), "/tmp").with_options(
            ExecutionOptions::default().error_mode(ErrorMode::Resolve),
        );
        let result = settle_exit(&req, Instant::now(), b"out".to_vec(), Vec::new(), 7).unwrap();
        assert_eq!(result.exit_code, 7);
        assert_eq!(result.stdout, "out");
        assert!(!result.success());
    }

    #[test]
    fn test_settle_exit_reject_fails_on_nonzero() {
        let req = ExecutionRequest::new("x", Vec::<String>::new(), "/tmp");
        let err = settle_exit(&req, Instant::now(), Vec::new(), b"boom".to_vec(), 2).unwrap_err();
        assert!(matches!(err, ExecError::NonZeroExit { .. }));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.failure().stderr, "boom");
    }
}
