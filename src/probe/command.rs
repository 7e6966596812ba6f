//! Command probe: executable and argv run directly, without an interpreter.

use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::{process, Outcome};
use crate::error::ConfigurationError;

/// Same exit-code and timeout semantics as [`super::ShellProbe`], but the
/// command line is split with POSIX shell-word rules and executed as-is, so
/// metacharacters are passed through literally.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl CommandProbe {
    pub fn new(probe: &str, command_line: Option<&str>) -> Result<Self, ConfigurationError> {
        let command_line = command_line.ok_or_else(|| ConfigurationError::MissingField {
            probe: probe.to_string(),
            field: "exec",
        })?;

        let mut words = shlex::split(command_line).ok_or_else(|| ConfigurationError::InvalidCommandLine {
            probe: probe.to_string(),
            command: command_line.to_string(),
        })?;
        if words.is_empty() {
            return Err(ConfigurationError::EmptyCommand {
                probe: probe.to_string(),
            });
        }

        let program = words.remove(0);
        Ok(Self { program, args: words })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub async fn execute(&self, timeout: Duration, cancel: &CancellationToken) -> Outcome {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        process::run(command, &self.program, timeout, cancel).await
    }
}
