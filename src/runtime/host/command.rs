// ABOUTME: Runs host programs with captured output and a hard deadline.
// ABOUTME: Every host backend call goes through here.

use crate::runtime::traits::HostError;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Result of running a host program.
#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, Copy)]
pub struct HostCommand {
    timeout: Duration,
}

impl HostCommand {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run a program, returning its output whatever the exit status.
    pub async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, HostError> {
        let command = describe(program, args);
        tracing::debug!("Running {}", command);

        let mut child = Command::new(program);
        child
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, child.output())
            .await
            .map_err(|_| HostError::Timeout {
                command: command.clone(),
                limit: self.timeout,
            })?
            .map_err(|source| HostError::Spawn {
                command: command.clone(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    /// Run a program and fail on a non-zero exit status.
    pub async fn run_checked(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<CommandOutput, HostError> {
        let output = self.run(program, args).await?;
        if output.success {
            Ok(output)
        } else {
            Err(HostError::CommandFailed {
                command: describe(program, args),
                code: output.exit_code,
                stderr: output.stderr,
            })
        }
    }
}

pub(crate) fn describe(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
