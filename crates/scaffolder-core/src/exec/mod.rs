//! External command execution
//!
//! This module provides:
//! - `execute`: run one process, capture stdout/stderr, settle once
//! - Options for error reporting mode, environment, shell use and echo
//! - `CommandRunner` trait so callers can substitute a test double

pub mod executor;
pub mod options;
pub mod outcome;

pub use executor::{execute, CommandRunner, ProcessExecutor};
pub use options::{should_use_shell, Environment, ErrorMode, ExecutionOptions, HostPlatform};
pub use outcome::{ExecutionFailure, ExecutionRequest, ExecutionResult, SENTINEL_EXIT_CODE};
