use crate::error::{ReleaseError, Result};
use std::process::Command;

/// Captured result of an external program run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external programs synchronously, with extra environment variables.
///
/// There is no timeout: a hanging program hangs the run.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    env: Vec<(String, String)>,
}

impl CommandRunner {
    pub fn new() -> Self {
        CommandRunner::default()
    }

    /// Add an environment variable passed to every program run.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Run a program and capture its output whatever the exit status.
    ///
    /// Only a failure to start the program is an error.
    pub fn capture(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        log::debug!("running {} {}", program, args.join(" "));

        let mut cmd = Command::new(program);
        cmd.args(args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|e| ReleaseError::Command {
            program: program.to_string(),
            code: -1,
            stderr: e.to_string(),
        })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run a program that must succeed.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = self.capture(program, args)?;

        if !output.success {
            return Err(ReleaseError::Command {
                program: program.to_string(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output)
    }
}
