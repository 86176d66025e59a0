//! Temp project layout under the harness root.

use crate::config::ScaffoldConfig;
use crate::variant::CliVariant;
use std::path::{Component, Path, PathBuf};

/// Resolves every path the harness touches for one CLI variant.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
    variant: CliVariant,
    tmp_dir: String,
    project_name: String,
    build_packages_dir: String,
}

impl ProjectPaths {
    /// Layout for `variant` under `root`.
    pub fn new(root: impl Into<PathBuf>, variant: CliVariant, scaffold: &ScaffoldConfig) -> Self {
        Self {
            root: root.into(),
            variant,
            tmp_dir: scaffold.tmp_dir.clone(),
            project_name: scaffold.project_name.clone(),
            build_packages_dir: scaffold.build_packages_dir.clone(),
        }
    }

    /// Harness root (the monorepo checkout).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Variant these paths belong to.
    pub fn variant(&self) -> CliVariant {
        self.variant
    }

    /// Name of the scaffolded project.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// `<root>/tmp/<cli>`: working directory of the generators.
    pub fn cli_tmp_dir(&self) -> PathBuf {
        self.root.join(&self.tmp_dir).join(self.variant.as_str())
    }

    /// `<root>/tmp/<cli>/proj`
    pub fn tmp_proj_path(&self) -> PathBuf {
        self.cli_tmp_dir().join(&self.project_name)
    }

    /// A path inside the temp project. A leading root is dropped, so
    /// `/apps` and `apps` name the same file.
    pub fn tmp_proj_file(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.tmp_proj_path().join(relative(rel.as_ref()))
    }

    /// `<root>/tmp/<cli>/proj-backup`
    pub fn tmp_backup_proj_path(&self) -> PathBuf {
        self.cli_tmp_dir()
            .join(format!("{}-backup", self.project_name))
    }

    /// A path inside the backup project.
    pub fn tmp_backup_proj_file(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.tmp_backup_proj_path().join(relative(rel.as_ref()))
    }

    /// Lock file guarding creation of the backup project.
    pub fn backup_lock_path(&self) -> PathBuf {
        self.cli_tmp_dir().join(".backup.lock")
    }

    /// Absolute paths pass through; anything else lives in the temp project.
    pub fn resolve(&self, f: impl AsRef<Path>) -> PathBuf {
        let f = f.as_ref();
        if f.is_absolute() {
            f.to_path_buf()
        } else {
            self.tmp_proj_file(f)
        }
    }

    /// `<root>/node_modules/<name>`
    pub fn root_node_modules(&self, name: &str) -> PathBuf {
        self.root.join("node_modules").join(name)
    }

    /// Locally built package, linked into scaffolded projects.
    pub fn build_package_path(&self, package: &str) -> PathBuf {
        self.root.join(&self.build_packages_dir).join(package)
    }

    /// Workspace configuration file of the temp project.
    pub fn workspace_config_path(&self) -> PathBuf {
        self.tmp_proj_file(self.variant.workspace_config_name())
    }
}

/// `path` without its root or drive prefix.
fn relative(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}
