use anyhow::{Context, Result};
use log::debug;
use std::process::Command;

use crate::utils::shell::ShellDetector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Passes `cmd` to the host shell. With `capture` the child's output is
/// collected; otherwise stdio is inherited and only the exit code comes
/// back. A non-zero child exit is not an error; failing to spawn is.
pub fn run_shell_command(cmd: &str, capture: bool) -> Result<ExecutionResult> {
    let mut command = shell_command(cmd);
    debug!("Executing shell command: {cmd}");

    if capture {
        let output = command
            .output()
            .with_context(|| format!("Failed to execute: {cmd}"))?;
        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code().unwrap_or(-1),
        })
    } else {
        let status = command
            .status()
            .with_context(|| format!("Failed to execute: {cmd}"))?;
        Ok(ExecutionResult {
            stdout: String::new(),
            stderr: String::new(),
            code: status.code().unwrap_or(-1),
        })
    }
}

fn shell_command(cmd: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", cmd]);
        command
    } else {
        let mut command = Command::new(ShellDetector::shell_binary());
        command.args(["-c", cmd]);
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_exit_code() {
        let result = run_shell_command("echo hello", true).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn nonzero_child_exit_is_reported_not_raised() {
        let result = run_shell_command("exit 3", true).unwrap();
        assert!(!result.success());
        assert_eq!(result.code, 3);
    }

    #[test]
    fn captures_stderr() {
        let result = run_shell_command("echo oops 1>&2", true).unwrap();
        assert_eq!(result.stderr.trim(), "oops");
    }
}
