use super::assertions::Assertion;
use super::runner::ScenarioRunner;
use super::steps::ScenarioStep;
use scaffold_core::{CliVariant, EnvOverrides};
use serde_json::Value;
use std::collections::HashMap;

/// Fluent DSL for building test scenarios
pub struct Scenario {
    name: String,
    variant: CliVariant,
    env: EnvOverrides,
    root_files: HashMap<String, Vec<u8>>,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variant: CliVariant::Nx,
            env: EnvOverrides::default(),
            root_files: HashMap::new(),
            steps: Vec::new(),
        }
    }

    // ===== Initial setup =====

    /// Run against the given CLI variant (nx by default)
    pub fn cli(mut self, variant: CliVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Behave as if `CIRCLECI` were set
    pub fn on_ci(mut self) -> Self {
        self.env.in_ci = true;
        self
    }

    /// Behave as if `WINDOWSTMP` were set
    pub fn windows_tmp(mut self, dir: &str) -> Self {
        self.env.windows_tmp = Some(dir.to_string());
        self
    }

    /// Add a file to the monorepo root before the harness opens
    pub fn with_root_file(mut self, path: &str, content: &[u8]) -> Self {
        self.root_files.insert(path.to_string(), content.to_vec());
        self
    }

    // ===== Project lifecycle =====

    /// Fresh temp project, restored from (or building) the backup
    pub fn new_project(mut self) -> Self {
        self.steps.push(ScenarioStep::NewProject);
        self
    }

    /// Temp project only if missing
    pub fn ensure_project(mut self) -> Self {
        self.steps.push(ScenarioStep::EnsureProject);
        self
    }

    /// Remove the temp project
    pub fn cleanup(mut self) -> Self {
        self.steps.push(ScenarioStep::Cleanup);
        self
    }

    /// Remove the backup project
    pub fn remove_backup(mut self) -> Self {
        self.steps.push(ScenarioStep::RemoveBackup);
        self
    }

    /// Vendor root node_modules into the temp project
    pub fn copy_missing_packages(mut self) -> Self {
        self.steps.push(ScenarioStep::CopyMissingPackages);
        self
    }

    /// Generate a workspace with `run_new`
    pub fn run_new(mut self, args: Option<&str>, silent: bool) -> Self {
        self.steps.push(ScenarioStep::RunNew {
            args: args.map(str::to_string),
            silent,
        });
        self
    }

    // ===== Commands =====

    /// Run the workspace CLI
    pub fn run_cli(mut self, command: &str) -> Self {
        self.steps.push(ScenarioStep::RunCli {
            command: command.to_string(),
            env: Vec::new(),
            silence_error: false,
        });
        self
    }

    /// Run the workspace CLI with an extra environment variable
    pub fn run_cli_with_env(mut self, command: &str, key: &str, value: &str) -> Self {
        self.steps.push(ScenarioStep::RunCli {
            command: command.to_string(),
            env: vec![(key.to_string(), value.to_string())],
            silence_error: false,
        });
        self
    }

    /// Run the workspace CLI, keeping stdout of a failure
    pub fn run_cli_silenced(mut self, command: &str) -> Self {
        self.steps.push(ScenarioStep::RunCli {
            command: command.to_string(),
            env: Vec::new(),
            silence_error: true,
        });
        self
    }

    /// Run the workspace CLI and require it to fail
    pub fn run_cli_expect_error(mut self, command: &str) -> Self {
        self.steps.push(ScenarioStep::RunCliExpectError {
            command: command.to_string(),
        });
        self
    }

    /// Run the workspace CLI on the async path
    pub fn run_cli_async(mut self, command: &str) -> Self {
        self.steps.push(ScenarioStep::RunCliAsync {
            command: command.to_string(),
            silence_error: false,
        });
        self
    }

    /// Run the workspace CLI on the async path, tolerating failure
    pub fn run_cli_async_silenced(mut self, command: &str) -> Self {
        self.steps.push(ScenarioStep::RunCliAsync {
            command: command.to_string(),
            silence_error: true,
        });
        self
    }

    /// Run the Angular CLI
    pub fn run_ng_add(mut self, command: &str) -> Self {
        self.steps.push(ScenarioStep::RunNgAdd {
            command: command.to_string(),
        });
        self
    }

    /// Run a raw shell command in the temp project
    pub fn run_command(mut self, command: &str) -> Self {
        self.steps.push(ScenarioStep::RunCommand {
            command: command.to_string(),
        });
        self
    }

    // ===== Files and patches =====

    /// Write a temp project file
    pub fn update_file(mut self, path: &str, content: &str) -> Self {
        self.steps.push(ScenarioStep::UpdateFile {
            path: path.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Move a temp project file
    pub fn rename_file(mut self, from: &str, to: &str) -> Self {
        self.steps.push(ScenarioStep::RenameFile {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    /// Remove `dist/`
    pub fn rm_dist(mut self) -> Self {
        self.steps.push(ScenarioStep::RmDist);
        self
    }

    /// Apply the WSL karma patch
    pub fn patch_karma(mut self) -> Self {
        self.steps.push(ScenarioStep::PatchKarma);
        self
    }

    /// Apply the CI worker cap
    pub fn set_max_workers(mut self) -> Self {
        self.steps.push(ScenarioStep::SetMaxWorkers);
        self
    }

    // ===== Assertions =====

    /// Add a general assertion
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.steps.push(ScenarioStep::Assert { assertion });
        self
    }

    /// Assert temp project paths exist
    pub fn assert_files_exist(self, files: &[&str]) -> Self {
        self.assert(Assertion::FilesExist(to_strings(files)))
    }

    /// Assert temp project paths are absent
    pub fn assert_files_absent(self, files: &[&str]) -> Self {
        self.assert(Assertion::FilesDoNotExist(to_strings(files)))
    }

    /// Assert a temp project file contains text
    pub fn assert_file_contains(self, path: &str, content: &str) -> Self {
        self.assert(Assertion::FileContains {
            path: path.to_string(),
            content: content.to_string(),
        })
    }

    /// Assert a temp project file lacks text
    pub fn assert_file_not_contains(self, path: &str, content: &str) -> Self {
        self.assert(Assertion::FileNotContains {
            path: path.to_string(),
            content: content.to_string(),
        })
    }

    /// Assert a JSON pointer inside a temp project file
    pub fn assert_json(self, path: &str, pointer: &str, expected: Value) -> Self {
        self.assert(Assertion::JsonValue {
            path: path.to_string(),
            pointer: pointer.to_string(),
            expected,
        })
    }

    /// Assert the last command output contains text
    pub fn assert_output_contains(self, text: &str) -> Self {
        self.assert(Assertion::OutputContains(text.to_string()))
    }

    /// Assert how often the fake generator ran
    pub fn assert_generator_runs(self, n: usize) -> Self {
        self.assert(Assertion::GeneratorRuns(n))
    }

    // ===== Execution =====

    /// Execute the scenario and return results
    pub fn run(self) -> ScenarioResult {
        let mut runner = match ScenarioRunner::new(self.variant, self.env, self.root_files) {
            Ok(r) => r,
            Err(e) => {
                return ScenarioResult {
                    name: self.name,
                    success: false,
                    steps_executed: 0,
                    failure_step: Some(0),
                    error: Some(format!("Failed to create runner: {:?}", e)),
                }
            }
        };

        match runner.execute(&self.steps) {
            Ok(()) => ScenarioResult {
                name: self.name,
                success: true,
                steps_executed: self.steps.len(),
                failure_step: None,
                error: None,
            },
            Err(e) => {
                let failure_step = runner.current_step();
                ScenarioResult {
                    name: self.name,
                    success: false,
                    steps_executed: failure_step,
                    failure_step: Some(failure_step),
                    error: Some(format!("{:?}", e)),
                }
            }
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Result of running a scenario
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub steps_executed: usize,
    pub failure_step: Option<usize>,
    pub error: Option<String>,
}

impl ScenarioResult {
    /// Unwrap the result, panicking if it failed
    pub fn unwrap(self) {
        if !self.success {
            panic!(
                "Scenario '{}' failed at step {}: {}",
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Expect the result to be successful
    pub fn expect(self, msg: &str) {
        if !self.success {
            panic!(
                "{}: Scenario '{}' failed at step {}: {}",
                msg,
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Convert into a `Result` for use inside other fallible code
    pub fn into_result(self) -> anyhow::Result<()> {
        if self.success {
            Ok(())
        } else {
            anyhow::bail!(
                "Scenario '{}' failed at step {}: {}",
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            )
        }
    }
}
