use anyhow::{Context, Result};
use scaffold_core::{CliVariant, EnvOverrides, Harness};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Root node_modules the fake monorepo vendors from.
const ROOT_NODE_MODULES: &[(&str, &str)] = &[
    ("node_modules/@nrwl/workspace/package.json", r#"{"version":"local"}"#),
    ("node_modules/@nrwl/jest/package.json", r#"{"version":"local"}"#),
    ("node_modules/semver/package.json", r#"{"version":"7.3.2"}"#),
    ("node_modules/.bin/webpack", "local webpack\n"),
    ("node_modules/karma/node_modules/mime/index.js", "module.exports = {};\n"),
    ("node_modules/karma/package.json", r#"{"version":"5.0.9"}"#),
];

/// Manages isolated monorepo checkouts with tempfile
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self { dir })
    }

    /// Load workspace from fixtures directory
    pub fn from_fixture(name: &str) -> Result<Self> {
        let workspace = Self::empty()?;
        let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name);

        if !fixture_path.exists() {
            anyhow::bail!("Fixture not found: {}", fixture_path.display());
        }

        copy_dir_recursive(&fixture_path, workspace.path())?;
        Ok(workspace)
    }

    /// Fake monorepo: the `monorepo` fixture plus a seeded root node_modules
    pub fn monorepo() -> Result<Self> {
        let workspace = Self::from_fixture("monorepo")?;
        for (path, content) in ROOT_NODE_MODULES {
            workspace.write_file(path, content.as_bytes())?;
        }
        Ok(workspace)
    }

    /// Get workspace path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a harness on this checkout with a fixed environment
    pub fn open_harness(&self, variant: CliVariant, env: EnvOverrides) -> Result<Harness> {
        Ok(Harness::open(self.path(), variant)?.with_env(env))
    }

    /// Write file relative to the monorepo root
    pub fn write_file(&self, path: &str, content: &[u8]) -> Result<()> {
        let full_path = self.path().join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directories for {}", path))?;
        }

        fs::write(&full_path, content)
            .with_context(|| format!("Failed to write file: {}", path))?;

        Ok(())
    }

    /// Read file relative to the monorepo root
    pub fn read_file(&self, path: &str) -> Result<String> {
        let full_path = self.path().join(path);
        fs::read_to_string(&full_path).with_context(|| format!("Failed to read file: {}", path))
    }

    /// Check if a path exists relative to the monorepo root
    pub fn file_exists(&self, path: &str) -> bool {
        self.path().join(path).exists()
    }

    /// Lines appended to a log file by the fake tools, zero when absent
    pub fn log_lines(&self, path: &str) -> usize {
        self.read_file(path)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }
}

/// Recursively copy directory contents
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
