//! Execution options and the shell-selection heuristic

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

/// Executables that never need a shell wrapper, even on Windows
const SHELL_FREE_COMMANDS: &[&str] = &["node", "git"];

/// How a failed command is reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Non-zero exit and spawn errors become `Err(ExecError)`
    #[default]
    Reject,
    /// Every outcome becomes `Ok(ExecutionResult)`; the caller inspects `exit_code`
    Resolve,
}

/// Operating system family, as far as shell selection cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl HostPlatform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => HostPlatform::Windows,
            "macos" => HostPlatform::MacOs,
            "linux" => HostPlatform::Linux,
            _ => HostPlatform::Other,
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, HostPlatform::Windows)
    }
}

/// Decide whether `command` must be launched through the platform shell.
///
/// Only Windows needs it, for `.cmd`/`.bat` shims such as `npm`; direct
/// binaries in [`SHELL_FREE_COMMANDS`] are launched as-is.
pub fn should_use_shell(command: &str, platform: HostPlatform) -> bool {
    platform.is_windows() && !SHELL_FREE_COMMANDS.contains(&command)
}

/// Environment handed to the child process.
///
/// The child's inherited environment is cleared and replaced by exactly these
/// variables, so tests can pass a deterministic map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// Snapshot of the current process environment, non-UTF-8 entries included
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    /// Empty environment
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment with `overrides` merged on top
    pub fn capture_with<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let mut env = Self::capture();
        env.extend(overrides);
        env
    }

    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn extend<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        for (key, value) in overrides {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsString, &OsString)> {
        self.vars.iter()
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::empty();
        env.extend(iter);
        env
    }
}

/// Options for a single command execution
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    pub error_mode: ErrorMode,
    pub environment: Environment,
    /// `None` defers to [`should_use_shell`] for the current host
    pub use_shell: Option<bool>,
    /// Mirror output chunks to the terminal as they arrive
    pub echo_output: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Reject,
            environment: Environment::capture(),
            use_shell: None,
            echo_output: false,
        }
    }
}

impl ExecutionOptions {
    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.environment.set(key, value);
        self
    }

    pub fn use_shell(mut self, use_shell: bool) -> Self {
        self.use_shell = Some(use_shell);
        self
    }

    pub fn echo_output(mut self, echo: bool) -> Self {
        self.echo_output = echo;
        self
    }

    /// Resolve the shell decision for `command` on `platform`
    pub fn resolve_shell(&self, command: &str, platform: HostPlatform) -> bool {
        self.use_shell
            .unwrap_or_else(|| should_use_shell(command, platform))
    }
}
