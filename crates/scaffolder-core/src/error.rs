//! Error types for scaffolder-core

use crate::exec::ExecutionFailure;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the workflow's error type
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Failure of an external command
#[derive(Error, Debug)]
pub enum ExecError {
    /// The process could not be started (missing binary, permission denied, bad cwd)
    #[error("Failed to run {failure}: {source}")]
    SpawnFailure {
        failure: ExecutionFailure,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but reported failure through its exit code
    #[error("{failure} exited with code {code}{excerpt}", code = .failure.exit_code, excerpt = stderr_excerpt(.failure))]
    NonZeroExit { failure: ExecutionFailure },
}

impl ExecError {
    /// Command context and captured output, common to both variants
    pub fn failure(&self) -> &ExecutionFailure {
        match self {
            ExecError::SpawnFailure { failure, .. } => failure,
            ExecError::NonZeroExit { failure } => failure,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.failure().exit_code
    }
}

fn stderr_excerpt(failure: &ExecutionFailure) -> String {
    let trimmed = failure.stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}

/// File operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOperation {
    Read,
    Write,
    Remove,
    Inspect,
}

impl std::fmt::Display for FsOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            FsOperation::Read => "read",
            FsOperation::Write => "write",
            FsOperation::Remove => "remove",
            FsOperation::Inspect => "inspect",
        };
        f.write_str(verb)
    }
}

/// Scaffolding workflow error types
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Template clone (or another external command) failed
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Read, write, or delete of a scaffold file failed
    #[error("Failed to {operation} {}: {source}", path.display())]
    FileSystem {
        operation: FsOperation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Prompt I/O failed or the user cancelled
    #[error("Prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    /// An answer could not be accepted
    #[error("Invalid answer for {question}: {message}")]
    InvalidAnswer { question: String, message: String },

    /// The clone step finished but the project directory is not there
    #[error("Project directory was not created: {}", path.display())]
    MissingProjectDir { path: PathBuf },

    /// Destination exists and already has content
    #[error("Directory {} already exists and is not empty", path.display())]
    DestinationNotEmpty { path: PathBuf },

    /// Template location could not be turned into a clone URL
    #[error("Invalid template location: {0}")]
    TemplateLocation(String),
}

impl ScaffoldError {
    pub(crate) fn fs(operation: FsOperation, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::FileSystem {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_answer(question: impl Into<String>, message: impl Into<String>) -> Self {
        ScaffoldError::InvalidAnswer {
            question: question.into(),
            message: message.into(),
        }
    }
}
