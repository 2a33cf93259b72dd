//! Command runner abstraction for actions that invoke external programs.
//!
//! Fast-path commands (launching an application, searching files) and
//! speech output go through this trait, with a real implementation
//! (`SystemCommandRunner`) and a scripted one for tests and dry runs.

use parking_lot::Mutex;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Output from a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code (None if the process never ran or was killed)
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
            success: false,
        }
    }

    /// The program could not be started at all.
    pub fn not_started(reason: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: reason.into(),
            exit_code: None,
            success: false,
        }
    }

    pub fn started(&self) -> bool {
        self.exit_code.is_some()
    }

    /// Non-empty stdout lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Trait for running external commands. Mockable for testing.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String], working_dir: Option<&Path>)
        -> CommandOutput;
}

/// Real command runner that spawns system processes.
pub struct SystemCommandRunner;

#[async_trait::async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> CommandOutput {
        debug!(program = %program, args = ?args, dir = ?working_dir, "Running command");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        match command.output().await {
            Ok(output) => CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                success: output.status.success(),
                exit_code: output.status.code(),
            },
            Err(e) => {
                warn!(program = %program, error = %e, "Command failed to execute");
                CommandOutput::not_started(format!("Failed to execute {}: {}", program, e))
            }
        }
    }
}

/// A recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCall {
    pub program: String,
    pub args: Vec<String>,
}

/// Runner that replays scripted outputs and records every call.
///
/// Once the script runs out it keeps answering with the fallback output.
pub struct ScriptedCommandRunner {
    responses: Mutex<Vec<CommandOutput>>,
    fallback: CommandOutput,
    calls: Mutex<Vec<CommandCall>>,
}

impl ScriptedCommandRunner {
    /// Create a runner that returns the given responses in order.
    pub fn new(responses: Vec<CommandOutput>) -> Self {
        Self {
            responses: Mutex::new(responses),
            fallback: CommandOutput::ok(""),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a runner that always succeeds with the given stdout.
    pub fn success(stdout: &str) -> Self {
        let mut runner = Self::new(Vec::new());
        runner.fallback = CommandOutput::ok(stdout);
        runner
    }

    /// Create a runner whose programs can never be started.
    pub fn unavailable() -> Self {
        let mut runner = Self::new(Vec::new());
        runner.fallback = CommandOutput::not_started("program not found");
        runner
    }

    pub fn calls(&self) -> Vec<CommandCall> {
        self.calls.lock().clone()
    }
}

#[async_trait::async_trait]
impl CommandRunner for ScriptedCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        _working_dir: Option<&Path>,
    ) -> CommandOutput {
        self.calls.lock().push(CommandCall {
            program: program.to_string(),
            args: args.to_vec(),
        });

        let mut responses = self.responses.lock();
        if responses.is_empty() {
            self.fallback.clone()
        } else {
            responses.remove(0)
        }
    }
}
