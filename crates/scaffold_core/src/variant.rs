//! CLI variant selection.
//!
//! The harness exercises two front-ends of the same tool. The variant decides
//! the sandbox directory (`tmp/<cli>`), the generator used by `new`, and the
//! name of the workspace configuration file. A process-wide "current" variant
//! is kept for test suites that set it once per group of tests and then build
//! a [`Harness`](crate::Harness) from it.

use crate::config::EnvOverrides;
use crate::error::{Result, ScaffoldError};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::info_span;

/// One of the two supported command-line front-ends.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CliVariant {
    /// The tool's own CLI.
    #[default]
    Nx = 0,
    /// The Angular CLI with the tool installed as a collection.
    Angular = 1,
}

impl CliVariant {
    /// Every variant, in the order suites run them.
    pub const ALL: [CliVariant; 2] = [CliVariant::Nx, CliVariant::Angular];

    /// Name used on the command line and in `tmp/<cli>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CliVariant::Nx => "nx",
            CliVariant::Angular => "angular",
        }
    }

    /// Workspace configuration file written by this variant's generator.
    pub fn workspace_config_name(&self) -> &'static str {
        match self {
            CliVariant::Angular => "angular.json",
            CliVariant::Nx => "workspace.json",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => CliVariant::Angular,
            _ => CliVariant::Nx,
        }
    }
}

impl fmt::Display for CliVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CliVariant {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "nx" => Ok(CliVariant::Nx),
            "angular" => Ok(CliVariant::Angular),
            other => Err(ScaffoldError::UnknownCli(other.to_string())),
        }
    }
}

static CURRENT_CLI: AtomicU8 = AtomicU8::new(CliVariant::Nx as u8);

/// Select the variant later read by [`current_cli`].
pub fn set_current_cli(variant: CliVariant) {
    CURRENT_CLI.store(variant as u8, Ordering::SeqCst);
}

/// The variant currently under test. `Nx` until something else is selected.
pub fn current_cli() -> CliVariant {
    CliVariant::from_u8(CURRENT_CLI.load(Ordering::SeqCst))
}

/// Decide which variants a suite runs.
///
/// `env_selected` (from `SELECTED_CLI`) always wins: a suite pinned to another
/// variant runs nothing, an unpinned suite runs only the selected variant.
/// Without an environment selection a pinned suite runs its own variant and
/// an unpinned suite runs both.
pub fn clis_to_run(
    selected: Option<CliVariant>,
    env_selected: Option<CliVariant>,
) -> Vec<CliVariant> {
    match (env_selected, selected) {
        (Some(env), Some(pinned)) if env == pinned => vec![env],
        (Some(_), Some(_)) => Vec::new(),
        (Some(env), None) => vec![env],
        (None, Some(pinned)) => vec![pinned],
        (None, None) => CliVariant::ALL.to_vec(),
    }
}

/// Run `callback` once per variant from [`clis_to_run`], selecting each as current first.
///
/// Stops at the first error.
pub fn for_each_cli<F>(selected: Option<CliVariant>, env: &EnvOverrides, mut callback: F) -> Result<()>
where
    F: FnMut(CliVariant) -> Result<()>,
{
    let env_selected = env
        .selected_cli
        .as_deref()
        .map(CliVariant::from_str)
        .transpose()?;

    for variant in clis_to_run(selected, env_selected) {
        let span = info_span!("cli", name = %format!("[{}]", variant));
        let _enter = span.enter();
        set_current_cli(variant);
        callback(variant)?;
    }
    Ok(())
}
