//! CLI commands.

pub mod check;
pub mod clean;
pub mod paths;
pub mod prepare;
pub mod run;
pub mod vendor;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use scaffold_core::{set_current_cli, CliVariant, EnvOverrides, Harness};
use std::path::PathBuf;
use std::time::Duration;

/// Root and CLI variant every command operates on.
pub struct Target {
    pub root: PathBuf,
    pub cli: CliVariant,
}

impl Target {
    /// `--cli` wins over `SELECTED_CLI`; nx when neither is given.
    pub fn resolve(root: PathBuf, cli: Option<CliVariant>) -> Result<Self> {
        let cli = match cli {
            Some(cli) => cli,
            None => EnvOverrides::from_env()
                .selected_cli
                .as_deref()
                .map(str::parse::<CliVariant>)
                .transpose()
                .context("Invalid SELECTED_CLI")?
                .unwrap_or_default(),
        };
        Ok(Self { root, cli })
    }

    /// Select the variant process-wide and open a harness for it.
    pub fn open(&self) -> Result<Harness> {
        set_current_cli(self.cli);
        Harness::open(&self.root, self.cli)
            .with_context(|| format!("Failed to open harness at {}", self.root.display()))
    }
}

pub(crate) fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
