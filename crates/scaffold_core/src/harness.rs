//! Harness handle providing the main API.

use crate::config::{Config, EnvOverrides};
use crate::error::{Result, ScaffoldError};
use crate::files::{self, ensure_parent_dir, exists, remove_path};
use crate::paths::ProjectPaths;
use crate::util::get_cwd;
use crate::variant::{current_cli, CliVariant};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Harness for one CLI variant rooted at a monorepo checkout.
///
/// Owns the path layout, the loaded configuration, and the environment
/// snapshot. File helpers resolve relative paths inside the temp project.
#[derive(Debug, Clone)]
pub struct Harness {
    pub(crate) paths: ProjectPaths,
    pub(crate) config: Config,
    pub(crate) env: EnvOverrides,
}

impl Harness {
    /// Opens a harness rooted at `root` for `variant`.
    ///
    /// Loads `scaffold.toml` from the root (defaults when absent) and
    /// snapshots the process environment.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use scaffold_core::{CliVariant, Harness};
    ///
    /// let harness = Harness::open(".", CliVariant::Nx).unwrap();
    /// harness.ensure_project().unwrap();
    /// harness.check_files_exist(&["package.json", "workspace.json"]).unwrap();
    /// ```
    pub fn open(root: impl AsRef<Path>, variant: CliVariant) -> Result<Self> {
        let root = root.as_ref();
        let config = Config::load(root)?;
        Ok(Self::with_config(root, variant, config))
    }

    /// Harness for the current working directory and the currently selected CLI.
    pub fn current() -> Result<Self> {
        Self::open(get_cwd()?, current_cli())
    }

    /// Harness with an explicit configuration.
    pub fn with_config(root: impl Into<PathBuf>, variant: CliVariant, config: Config) -> Self {
        let paths = ProjectPaths::new(root, variant, &config.scaffold);
        Self {
            paths,
            config,
            env: EnvOverrides::from_env(),
        }
    }

    /// Replace the environment snapshot.
    pub fn with_env(mut self, env: EnvOverrides) -> Self {
        self.env = env;
        self
    }

    /// Path layout.
    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// Loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Environment snapshot.
    pub fn env(&self) -> &EnvOverrides {
        &self.env
    }

    /// Variant under test.
    pub fn cli(&self) -> CliVariant {
        self.paths.variant()
    }

    /// `angular.json` or `workspace.json`, depending on the variant.
    pub fn workspace_config_name(&self) -> &'static str {
        self.cli().workspace_config_name()
    }

    /// `tmp/<cli>/proj`
    pub fn tmp_proj_path(&self) -> PathBuf {
        self.paths.tmp_proj_path()
    }

    /// A path inside the temp project.
    pub fn tmp_proj_file(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.paths.tmp_proj_file(rel)
    }

    /// `tmp/<cli>/proj-backup`
    pub fn tmp_backup_proj_path(&self) -> PathBuf {
        self.paths.tmp_backup_proj_path()
    }

    // ===== File helpers =====

    /// Read a file as UTF-8. Absolute paths are read as-is.
    pub fn read_file(&self, f: impl AsRef<Path>) -> Result<String> {
        let path = self.paths.resolve(f);
        fs::read_to_string(&path).map_err(|e| ScaffoldError::path_io(path, e))
    }

    /// Read and parse a JSON file.
    pub fn read_json(&self, f: impl AsRef<Path>) -> Result<Value> {
        let path = self.paths.resolve(f.as_ref());
        let content = self.read_file(f)?;
        serde_json::from_str(&content).map_err(|e| ScaffoldError::Json {
            path,
            reason: e.to_string(),
        })
    }

    /// Write `content` to a temp project file, creating parent directories.
    pub fn update_file(&self, f: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Result<()> {
        let path = self.tmp_proj_file(f);
        ensure_parent_dir(&path)?;
        fs::write(&path, content).map_err(|e| ScaffoldError::path_io(path, e))
    }

    /// Rewrite a temp project file from its current content.
    pub fn update_file_with<F>(&self, f: impl AsRef<Path>, update: F) -> Result<()>
    where
        F: FnOnce(&str) -> String,
    {
        let path = self.tmp_proj_file(f);
        ensure_parent_dir(&path)?;
        let current = fs::read_to_string(&path).map_err(|e| ScaffoldError::path_io(&path, e))?;
        fs::write(&path, update(&current)).map_err(|e| ScaffoldError::path_io(path, e))
    }

    /// Serialize `value` as 2-space indented JSON into a temp project file.
    pub fn write_json(&self, f: impl AsRef<Path>, value: &Value) -> Result<()> {
        let f = f.as_ref();
        let content = serde_json::to_string_pretty(value).map_err(|e| ScaffoldError::Json {
            path: self.tmp_proj_file(f),
            reason: e.to_string(),
        })?;
        self.update_file(f, content)
    }

    /// Move a temp project file, creating the target's parent directories.
    pub fn rename_file(&self, f: impl AsRef<Path>, new_path: impl AsRef<Path>) -> Result<()> {
        let from = self.tmp_proj_file(f);
        let to = self.tmp_proj_file(new_path);
        ensure_parent_dir(&to)?;
        fs::rename(&from, &to).map_err(|e| ScaffoldError::path_io(from, e))
    }

    /// Names of the entries of a temp project directory, sorted.
    pub fn list_files(&self, dir: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = self.tmp_proj_file(dir);
        let mut names = fs::read_dir(&path)
            .map_err(|e| ScaffoldError::path_io(&path, e))?
            .map(|entry| {
                entry
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .map_err(|e| ScaffoldError::path_io(&path, e))
            })
            .collect::<Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    /// Fail on the first path that is neither a file nor a directory.
    pub fn check_files_exist<P: AsRef<Path>>(&self, expected: &[P]) -> Result<()> {
        for f in expected {
            let path = self.paths.resolve(f);
            if !exists(&path) {
                return Err(ScaffoldError::FileMissing(path));
            }
        }
        Ok(())
    }

    /// Fail on the first path that exists.
    pub fn check_files_do_not_exist<P: AsRef<Path>>(&self, unexpected: &[P]) -> Result<()> {
        for f in unexpected {
            let path = self.paths.resolve(f);
            if exists(&path) {
                return Err(ScaffoldError::UnexpectedFile(path));
            }
        }
        Ok(())
    }

    /// Whether a temp project path (or absolute path) is a directory.
    pub fn directory_exists(&self, f: impl AsRef<Path>) -> bool {
        files::directory_exists(self.paths.resolve(f))
    }

    /// Whether a temp project path (or absolute path) is a file.
    pub fn file_exists(&self, f: impl AsRef<Path>) -> bool {
        files::file_exists(self.paths.resolve(f))
    }

    /// Whether a temp project path (or absolute path) exists.
    pub fn exists(&self, f: impl AsRef<Path>) -> bool {
        exists(self.paths.resolve(f))
    }

    /// Size of a temp project file (or absolute path) in bytes.
    pub fn get_size(&self, f: impl AsRef<Path>) -> Result<u64> {
        files::get_size(self.paths.resolve(f))
    }

    /// Remove the temp project.
    pub fn cleanup(&self) -> Result<()> {
        debug!(path = %self.tmp_proj_path().display(), "cleaning temp project");
        remove_path(self.tmp_proj_path())
    }

    /// Remove the backup project so the next `new_project` scaffolds from scratch.
    pub fn remove_backup(&self) -> Result<()> {
        remove_path(self.tmp_backup_proj_path())
    }

    /// Remove `dist/` from the temp project.
    pub fn rm_dist(&self) -> Result<()> {
        remove_path(self.tmp_proj_file("dist"))
    }
}
