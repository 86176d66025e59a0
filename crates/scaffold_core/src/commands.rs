//! Command wrappers run inside the temp project.

use crate::error::{Result, ScaffoldError};
use crate::exec::{
    capture_shell, capture_shell_async, needs_max_workers, run_shell, strip_ansi, CommandOutput,
    RunOpts,
};
use crate::harness::Harness;
use tracing::{info, warn};

impl Harness {
    /// Run the tool's CLI with `command` and return its ANSI-stripped stdout.
    ///
    /// App generators that need a worker cap trigger [`Harness::set_max_workers`].
    /// A failing command returns its stdout under `silence_error`; otherwise
    /// its output is logged and the error returned.
    pub fn run_cli(&self, command: &str, opts: &RunOpts) -> Result<String> {
        let line = format!("{} {}", self.config.commands.cli, command);
        match run_shell(&line, &self.tmp_proj_path(), opts.env.as_ref(), false) {
            Ok(output) => {
                let stdout = strip_ansi(&output.stdout)?;
                info!(command, "{}", stdout);
                if needs_max_workers(command)? {
                    self.set_max_workers()?;
                }
                Ok(stdout)
            }
            Err(e) => recover_or_log(e, opts),
        }
    }

    /// Run the Angular CLI binary of the temp project with `command`.
    pub fn run_ng_add(&self, command: &str, opts: &RunOpts) -> Result<String> {
        let line = format!("{} {}", self.config.commands.ng, command);
        match run_shell(&line, &self.tmp_proj_path(), opts.env.as_ref(), false) {
            Ok(output) => strip_ansi(&output.stdout),
            Err(e) => recover_or_log(e, opts),
        }
    }

    /// Run an arbitrary shell command in the temp project.
    ///
    /// Never fails on exit status: a failed command yields stdout followed by stderr.
    pub fn run_command(&self, command: &str) -> Result<String> {
        let output = capture_shell(command, &self.tmp_proj_path(), None)?;
        if output.success() {
            info!(command, "{}", output.stdout);
            Ok(output.stdout)
        } else {
            Ok(format!("{}{}", output.stdout, output.stderr))
        }
    }

    /// Run a shell command in the temp project without blocking the runtime.
    ///
    /// A non-zero exit is an error unless `silence_error` is set.
    pub async fn run_command_async(&self, command: &str, opts: &RunOpts) -> Result<CommandOutput> {
        let output = capture_shell_async(command, &self.tmp_proj_path(), opts.env.as_ref()).await?;
        if opts.silence_error {
            Ok(output)
        } else {
            output.into_result(command)
        }
    }

    /// Async counterpart of [`Harness::run_cli`], returning both streams untouched.
    pub async fn run_cli_async(&self, command: &str, opts: &RunOpts) -> Result<CommandOutput> {
        let line = format!("{} {}", self.config.commands.cli, command);
        self.run_command_async(&line, opts).await
    }
}

fn recover_or_log(err: ScaffoldError, opts: &RunOpts) -> Result<String> {
    if let ScaffoldError::CommandFailed {
        command,
        stdout,
        stderr,
        ..
    } = &err
    {
        if opts.silence_error {
            return Ok(stdout.clone());
        }
        warn!(command = %command, stdout = %stdout, stderr = %stderr, "command failed");
    }
    Err(err)
}
