//! Runtime detection for git

use crate::exec::{CommandRunner, ErrorMode, ExecutionOptions, ExecutionRequest};
use std::path::Path;
use tracing::debug;

/// Where to get git when it is missing
pub const GIT_INSTALL_URL: &str = "https://git-scm.com/downloads";

/// Runtime detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Check if `program` (normally `git`) runs and report its version
pub async fn check_git<R: CommandRunner>(runner: &R, program: &str, cwd: &Path) -> RuntimeInfo {
    let request = ExecutionRequest::new(program, ["--version"], cwd)
        .with_options(ExecutionOptions::default().error_mode(ErrorMode::Resolve));

    match runner.run(request).await {
        Ok(result) if result.success() => RuntimeInfo {
            name: "Git",
            version: Some(parse_git_version(&result.stdout)),
            available: true,
        },
        Ok(result) => {
            debug!(
                exit_code = result.exit_code,
                spawn_error = ?result.spawn_error,
                "git --version failed"
            );
            missing()
        }
        Err(e) => {
            debug!(error = %e, "git --version failed");
            missing()
        }
    }
}

/// Like [`check_git`], but a missing git is an error
pub async fn require_git<R: CommandRunner>(
    runner: &R,
    program: &str,
    cwd: &Path,
) -> anyhow::Result<RuntimeInfo> {
    let info = check_git(runner, program, cwd).await;
    if !info.available {
        anyhow::bail!(
            "Missing required runtime:\n  - Git (install from {})",
            GIT_INSTALL_URL
        );
    }
    Ok(info)
}

fn missing() -> RuntimeInfo {
    RuntimeInfo {
        name: "Git",
        version: None,
        available: false,
    }
}

/// `git version 2.43.0` -> `2.43.0`
fn parse_git_version(stdout: &str) -> String {
    let line = stdout.lines().next().unwrap_or("").trim();
    line.strip_prefix("git version ")
        .unwrap_or(line)
        .to_string()
}
