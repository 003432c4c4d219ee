//! Request and outcome types for the process executor

use super::options::ExecutionOptions;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Exit code reported when no real code exists (spawn failure, killed by signal)
pub const SENTINEL_EXIT_CODE: i32 = -1;

/// One external command to run
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub command: String,
    pub arguments: Vec<String>,
    pub working_directory: PathBuf,
    pub options: ExecutionOptions,
}

impl ExecutionRequest {
    pub fn new<I, S>(command: impl Into<String>, arguments: I, working_directory: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            working_directory: working_directory.into(),
            options: ExecutionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    /// `command arg1 arg2 ...`, for messages
    pub fn command_line(&self) -> String {
        command_line(&self.command, &self.arguments)
    }
}

fn command_line(command: &str, arguments: &[String]) -> String {
    std::iter::once(command)
        .chain(arguments.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Settled outcome of a command.
///
/// In reject mode this is only returned for exit code 0. In resolve mode it is
/// returned for every outcome, with `spawn_error` set when the process never ran.
#[derive(Debug)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub working_directory: PathBuf,
    pub elapsed: Duration,
    pub spawn_error: Option<std::io::Error>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && self.spawn_error.is_none()
    }
}

/// Command context and captured output of a failed command
#[derive(Debug, Clone)]
pub struct ExecutionFailure {
    pub command: String,
    pub arguments: Vec<String>,
    pub working_directory: PathBuf,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub elapsed: Duration,
}

impl ExecutionFailure {
    pub fn command_line(&self) -> String {
        command_line(&self.command, &self.arguments)
    }
}

impl fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` (in {}, after {}ms)",
            self.command_line(),
            self.working_directory.display(),
            self.elapsed.as_millis()
        )
    }
}
