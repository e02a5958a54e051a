//! Subprocess execution behind a trait so callers can be tested with canned output.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AdminError, Result};

/// Runs an external program to completion and hands back its stdout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`. A spawn failure or non-zero exit is an error.
    async fn run(&self, program: &str, args: &[&str]) -> Result<String>;
}

/// Runs commands on the host via `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let command = display_command(program, args);
        debug!(%command, "running");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| AdminError::CommandFailed {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => output.status.to_string(),
                msg => msg.to_string(),
            };
            return Err(AdminError::CommandFailed { command, message });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Render a command line for logs and error messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
