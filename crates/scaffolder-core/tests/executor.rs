//! Integration tests for the process executor
//!
//! These spawn real processes through `sh`, so they only run on unix.

#![cfg(unix)]

use scaffolder_core::exec::{
    execute, Environment, ErrorMode, ExecutionOptions, ExecutionRequest, SENTINEL_EXIT_CODE,
};
use scaffolder_core::ExecError;
use std::time::Duration;

fn sh(script: &str) -> ExecutionRequest {
    ExecutionRequest::new("sh", ["-c", script], std::env::temp_dir())
}

fn resolve() -> ExecutionOptions {
    ExecutionOptions::default().error_mode(ErrorMode::Resolve)
}

#[tokio::test]
async fn test_success_captures_both_streams() {
    let result = execute(&sh("printf hello; printf warn >&2")).await.unwrap();

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout, "hello");
    assert_eq!(result.stderr, "warn");
    assert_eq!(result.working_directory, std::env::temp_dir());
    assert!(result.spawn_error.is_none());
    assert!(result.success());
}

#[tokio::test]
async fn test_reject_mode_nonzero_exit_carries_code_and_output() {
    for code in [1, 3, 128] {
        let script = format!("printf partial; printf oops >&2; exit {}", code);
        let err = execute(&sh(&script)).await.unwrap_err();

        match &err {
            ExecError::NonZeroExit { failure } => {
                assert_eq!(failure.exit_code, code);
                assert_eq!(failure.stdout, "partial");
                assert_eq!(failure.stderr, "oops");
                assert_eq!(failure.command, "sh");
                assert_eq!(failure.arguments[0], "-c");
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
        assert!(err.to_string().contains(&format!("exited with code {}", code)));
    }
}

#[tokio::test]
async fn test_resolve_mode_never_rejects() {
    for code in [0, 1, 42] {
        let request = sh(&format!("printf out; exit {}", code)).with_options(resolve());
        let result = execute(&request).await.unwrap();
        assert_eq!(result.exit_code, code);
        assert_eq!(result.stdout, "out");
    }
}

#[tokio::test]
async fn test_missing_command_uses_sentinel_in_both_modes() {
    let name = "scaffolder-core-definitely-not-a-command";

    let rejected = execute(&ExecutionRequest::new(name, ["x"], std::env::temp_dir()))
        .await
        .unwrap_err();
    assert!(matches!(rejected, ExecError::SpawnFailure { .. }));
    assert_eq!(rejected.exit_code(), SENTINEL_EXIT_CODE);

    let resolved = execute(
        &ExecutionRequest::new(name, ["x"], std::env::temp_dir()).with_options(resolve()),
    )
    .await
    .unwrap();
    assert_eq!(resolved.exit_code, SENTINEL_EXIT_CODE);
    assert!(resolved.spawn_error.is_some());
    assert!(!resolved.success());
}

#[tokio::test]
async fn test_missing_working_directory_is_spawn_failure() {
    let dir = tempfile::tempdir().unwrap();
    let request = ExecutionRequest::new("sh", ["-c", "true"], dir.path().join("gone"));

    let err = execute(&request).await.unwrap_err();
    assert!(matches!(err, ExecError::SpawnFailure { .. }));
    assert_eq!(err.failure().working_directory, dir.path().join("gone"));
}

#[tokio::test]
async fn test_empty_command_is_spawn_failure() {
    let err = execute(&ExecutionRequest::new("", Vec::<String>::new(), "."))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::SpawnFailure { .. }));
}

#[tokio::test]
async fn test_large_output_on_both_pipes_does_not_block() {
    // Well past the OS pipe buffer on both streams
    let script = "i=0; while [ $i -lt 2000 ]; do \
                  echo 0123456789012345678901234567890123456789012345678901234567890123456789; \
                  echo 0123456789012345678901234567890123456789012345678901234567890123456789 >&2; \
                  i=$((i+1)); done";
    let result = execute(&sh(script)).await.unwrap();

    assert_eq!(result.stdout.lines().count(), 2000);
    assert_eq!(result.stderr.lines().count(), 2000);
}

#[tokio::test]
async fn test_environment_is_injected_not_inherited() {
    let mut env = Environment::empty();
    if let Ok(path) = std::env::var("PATH") {
        env.set("PATH", path);
    }
    env.set("SCAFFOLD_GREETING", "hi");

    let request = sh("printf '%s %s' \"$SCAFFOLD_GREETING\" \"${HOME:-unset}\"")
        .with_options(ExecutionOptions::default().environment(env));
    let result = execute(&request).await.unwrap();

    assert_eq!(result.stdout, "hi unset");
}

#[tokio::test]
async fn test_non_utf8_variables_reach_the_child() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let mut env = Environment::empty();
    if let Some(path) = std::env::var_os("PATH") {
        env.set("PATH", path);
    }
    env.set("LEGACY_LATIN1", OsStr::from_bytes(b"caf\xe9"));

    let request = sh("[ -n \"$LEGACY_LATIN1\" ] && printf present")
        .with_options(ExecutionOptions::default().environment(env));
    let result = execute(&request).await.unwrap();

    assert_eq!(result.stdout, "present");
}

#[tokio::test]
async fn test_elapsed_time_is_recorded() {
    let result = execute(&sh("sleep 0.2")).await.unwrap();
    assert!(result.elapsed >= Duration::from_millis(150));

    let err = execute(&sh("sleep 0.1; exit 2")).await.unwrap_err();
    assert!(err.failure().elapsed >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_killed_by_signal_reports_sentinel() {
    let err = execute(&sh("kill -9 $$")).await.unwrap_err();
    assert!(matches!(err, ExecError::NonZeroExit { .. }));
    assert_eq!(err.exit_code(), SENTINEL_EXIT_CODE);
}

#[tokio::test]
async fn test_echo_mode_keeps_captured_output() {
    let request = sh("printf echoed").with_options(ExecutionOptions::default().echo_output(true));
    let result = execute(&request).await.unwrap();
    assert_eq!(result.stdout, "echoed");
}
