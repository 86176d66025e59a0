//! Scaffolding of temp projects and the backup cache.
//!
//! Generating a workspace and installing its dependencies takes minutes, so
//! the first [`Harness::new_project`] for a CLI variant does it once and
//! parks the result at `tmp/<cli>/proj-backup`. Every later call only copies
//! the backup into place.

use crate::error::{Result, ScaffoldError};
use crate::exec::run_shell;
use crate::files::{copy_path, directory_exists};
use crate::harness::Harness;
use crate::patches::apply_local_package_deps;
use crate::variant::CliVariant;
use crate::vendor::{NOOP_EXECUTOR_STUB, SCHEMATICS_EXECUTOR};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use tracing::{debug, info, warn};

impl Harness {
    /// Install dependencies of the temp project with the package manager.
    ///
    /// Silent runs discard all output and return an empty string.
    pub fn run_yarn_install(&self, silent: bool) -> Result<String> {
        let install = &self.config.commands.install;
        let output = run_shell(install, &self.tmp_proj_path(), None, silent)?;
        Ok(output.stdout)
    }

    /// Run ngcc over the temp project's node_modules.
    ///
    /// `async_mode == false` adds `--async=false`. Skipped when no ngcc command is configured.
    pub fn run_ngcc(&self, silent: bool, async_mode: bool) -> Result<String> {
        let ngcc = self.config.commands.ngcc.trim();
        if ngcc.is_empty() {
            debug!("ngcc disabled");
            return Ok(String::new());
        }
        let line = if async_mode {
            ngcc.to_string()
        } else {
            format!("{} --async=false", ngcc)
        };
        let output = run_shell(&line, &self.tmp_proj_path(), None, silent)?;
        Ok(output.stdout)
    }

    /// Link the locally built packages into the temp project's devDependencies.
    pub fn patch_package_json_deps(&self, add_workspace: bool) -> Result<()> {
        let scaffold = &self.config.scaffold;
        let mut packages: Vec<&str> = Vec::new();
        if add_workspace {
            packages.push(&scaffold.workspace_package);
        }
        packages.extend(scaffold.local_packages.iter().map(String::as_str));

        let deps: Vec<(String, String)> = packages
            .into_iter()
            .map(|pkg| {
                let path = self.paths.build_package_path(pkg);
                (format!("@nrwl/{}", pkg), format!("file:{}", path.display()))
            })
            .collect();

        let mut package_json = self.read_json("package.json")?;
        apply_local_package_deps(&mut package_json, &deps);
        self.write_json("package.json", &package_json)
    }

    /// Generate a new workspace with the current CLI's `new` command.
    ///
    /// The generator runs from `tmp/<cli>`; its package.json is then pointed
    /// at the local builds and dependencies are installed. Returns `None` when
    /// `silent`, otherwise generator output followed by install output.
    pub fn run_new(&self, args: Option<&str>, silent: bool, add_workspace: bool) -> Result<Option<String>> {
        let generator = match self.cli() {
            CliVariant::Angular => &self.config.commands.angular_generator,
            CliVariant::Nx => &self.config.commands.nx_generator,
        };
        let line = format!(
            "{} new {} --no-interactive --skip-install {}",
            generator,
            self.paths.project_name(),
            args.unwrap_or("")
        );

        let cwd = self.paths.cli_tmp_dir();
        fs::create_dir_all(&cwd).map_err(|e| ScaffoldError::path_io(&cwd, e))?;
        info!(cli = %self.cli(), "generating workspace");
        let generated = run_shell(line.trim_end(), &cwd, None, silent)?;

        self.patch_package_json_deps(add_workspace)?;
        // Install output is always captured so a failed install carries its log.
        let install = self.run_yarn_install(false)?;

        if silent {
            Ok(None)
        } else {
            Ok(Some(format!("{}{}", generated.stdout, install)))
        }
    }

    /// Give the current CLI a fresh temp project.
    ///
    /// The temp project is wiped first. When no backup exists yet, one is
    /// generated, vendored and parked at `tmp/<cli>/proj-backup`. The temp
    /// project is then copied from the backup.
    pub fn new_project(&self) -> Result<()> {
        self.cleanup()?;

        let backup = self.tmp_backup_proj_path();
        {
            let _lock = BackupLock::acquire(&self.paths.backup_lock_path())?;
            if !directory_exists(&backup) {
                info!(cli = %self.cli(), "creating backup project");
                let new_args = self.config.scaffold.new_args.clone();
                self.run_new(Some(&new_args), true, true)?;
                self.copy_missing_packages()?;
                self.update_file(SCHEMATICS_EXECUTOR, NOOP_EXECUTOR_STUB)?;

                let in_ci = self.env.in_ci;
                self.run_ngcc(!in_ci, !in_ci)?;

                let proj = self.tmp_proj_path();
                fs::rename(&proj, &backup).map_err(|e| ScaffoldError::path_io(&proj, e))?;
            }
        }

        debug!(from = %backup.display(), "restoring temp project from backup");
        copy_path(&backup, self.tmp_proj_path())
    }

    /// Create the temp project only if it is missing.
    pub fn ensure_project(&self) -> Result<()> {
        if !directory_exists(self.tmp_proj_path()) {
            self.new_project()?;
        }
        Ok(())
    }
}

/// Exclusive lock on `tmp/<cli>/.backup.lock`, held while the backup is checked and built.
struct BackupLock {
    file: File,
}

impl BackupLock {
    fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ScaffoldError::path_io(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|e| ScaffoldError::path_io(path, e))?;
        file.lock_exclusive()
            .map_err(|source| ScaffoldError::BackupLocked {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { file })
    }
}

impl Drop for BackupLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!("Failed to release backup lock: {}", e);
        }
    }
}
