//! Shell probe: a command line run through the system interpreter.

use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::{process, Outcome};
use crate::error::ConfigurationError;

#[cfg(unix)]
const SHELL: &str = "/bin/sh";
#[cfg(unix)]
const SHELL_FLAG: &str = "-c";

#[cfg(windows)]
const SHELL: &str = "cmd";
#[cfg(windows)]
const SHELL_FLAG: &str = "/C";

/// Healthy iff the interpreter exits with status 0 before the deadline.
#[derive(Debug, Clone)]
pub struct ShellProbe {
    command_line: String,
}

impl ShellProbe {
    pub fn new(probe: &str, command_line: Option<&str>) -> Result<Self, ConfigurationError> {
        let command_line = command_line.ok_or_else(|| ConfigurationError::MissingField {
            probe: probe.to_string(),
            field: "exec",
        })?;
        if command_line.trim().is_empty() {
            return Err(ConfigurationError::EmptyCommand {
                probe: probe.to_string(),
            });
        }
        Ok(Self {
            command_line: command_line.to_string(),
        })
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub async fn execute(&self, timeout: Duration, cancel: &CancellationToken) -> Outcome {
        let mut command = Command::new(SHELL);
        command.arg(SHELL_FLAG).arg(&self.command_line);
        process::run(command, SHELL, timeout, cancel).await
    }
}
