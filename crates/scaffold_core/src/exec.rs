//! Shell command execution.
//!
//! Every command is a single shell string, run through `sh -c` (`cmd /C` on
//! Windows) so templates from `scaffold.toml` can carry their own arguments.
//! Nothing here retries or times out: a child runs until it exits and its
//! status decides the outcome.

use crate::error::{Result, ScaffoldError};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;
use tracing::debug;

/// Options shared by the command wrappers.
#[derive(Debug, Clone, Default)]
pub struct RunOpts {
    /// Return captured output instead of failing on a non-zero exit.
    pub silence_error: bool,
    /// Variables set on top of the inherited environment.
    pub env: Option<HashMap<String, String>>,
}

impl RunOpts {
    /// Options that swallow command failures.
    pub fn silenced() -> Self {
        Self {
            silence_error: true,
            env: None,
        }
    }

    /// Add one environment variable for the child.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Captured result of one child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Exit code; `None` when the child was killed by a signal.
    pub status: Option<i32>,
}

impl CommandOutput {
    /// Whether the child exited with status 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    fn from_output(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        }
    }

    /// Turn a non-zero exit into `CommandFailed`.
    pub fn into_result(self, command: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ScaffoldError::CommandFailed {
                command: command.to_string(),
                status: self.status,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

fn shell_parts(command: &str) -> (&'static str, [&str; 2]) {
    if cfg!(windows) {
        ("cmd", ["/C", command])
    } else {
        ("sh", ["-c", command])
    }
}

fn shell_command(command: &str, cwd: &Path, env: Option<&HashMap<String, String>>) -> Command {
    let (program, args) = shell_parts(command);
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(cwd);
    if let Some(env) = env {
        cmd.envs(env);
    }
    cmd
}

/// Run `command` in `cwd`, failing on a non-zero exit.
///
/// With `silent` all stdio is discarded and the returned output is empty.
pub fn run_shell(
    command: &str,
    cwd: &Path,
    env: Option<&HashMap<String, String>>,
    silent: bool,
) -> Result<CommandOutput> {
    debug!(command, cwd = %cwd.display(), silent, "running");
    let mut cmd = shell_command(command, cwd, env);
    cmd.stdin(Stdio::null());
    if silent {
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
    }
    let output = cmd.output().map_err(|source| ScaffoldError::CommandSpawn {
        command: command.to_string(),
        source,
    })?;
    CommandOutput::from_output(output).into_result(command)
}

/// Run `command` in `cwd` and capture everything, whatever the exit status.
pub fn capture_shell(
    command: &str,
    cwd: &Path,
    env: Option<&HashMap<String, String>>,
) -> Result<CommandOutput> {
    debug!(command, cwd = %cwd.display(), "capturing");
    let output = shell_command(command, cwd, env)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ScaffoldError::CommandSpawn {
            command: command.to_string(),
            source,
        })?;
    Ok(CommandOutput::from_output(output))
}

/// Async counterpart of [`capture_shell`]: one child process, awaited to completion.
pub async fn capture_shell_async(
    command: &str,
    cwd: &Path,
    env: Option<&HashMap<String, String>>,
) -> Result<CommandOutput> {
    debug!(command, cwd = %cwd.display(), "spawning async");
    let (program, args) = shell_parts(command);
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args).current_dir(cwd).stdin(Stdio::null());
    if let Some(env) = env {
        cmd.envs(env);
    }
    let output = cmd
        .output()
        .await
        .map_err(|source| ScaffoldError::CommandSpawn {
            command: command.to_string(),
            source,
        })?;
    Ok(CommandOutput::from_output(output))
}

type Compiled = std::result::Result<Regex, regex::Error>;

fn compiled(cell: &'static OnceLock<Compiled>, pattern: &str) -> Result<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| ScaffoldError::Pattern(e.clone()))
}

fn ansi_regex() -> Result<&'static Regex> {
    static ANSI: OnceLock<Compiled> = OnceLock::new();
    compiled(
        &ANSI,
        r"[\x1b\x{9b}][\[()#;?]*(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-ORZcf-nqry=><]",
    )
}

/// Remove ANSI / VT100 escape sequences (colors, cursor moves).
pub fn strip_ansi(s: &str) -> Result<String> {
    Ok(ansi_regex()?.replace_all(s, "").into_owned())
}

fn app_generator_regex() -> Result<&'static Regex> {
    static APP_GENERATOR: OnceLock<Compiled> = OnceLock::new();
    compiled(&APP_GENERATOR, r"g.*(express|nest|node|web|react):app.*")
}

/// Whether a CLI command generates an app whose builder needs a worker cap.
pub fn needs_max_workers(command: &str) -> Result<bool> {
    Ok(app_generator_regex()?.is_match(command))
}

/// Check jest output for a clean run.
pub fn expect_tests_pass(output: &CommandOutput) -> Result<()> {
    if !output.stderr.contains("Ran all test suites") {
        return Err(ScaffoldError::TestsFailed(
            "stderr does not contain 'Ran all test suites'".to_string(),
        ));
    }
    if output.stderr.contains("fail") {
        return Err(ScaffoldError::TestsFailed(
            "stderr reports a failure".to_string(),
        ));
    }
    Ok(())
}
