//! Filesystem primitives with `cp -a` / `rm -rf` semantics.

use crate::error::{Result, ScaffoldError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// True when `path` is a directory. Any stat failure counts as absent.
pub fn directory_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// True when `path` is a regular file. Any stat failure counts as absent.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// True when `path` is a file or a directory.
pub fn exists(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    directory_exists(path) || file_exists(path)
}

/// Size in bytes.
pub fn get_size(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| ScaffoldError::path_io(path, e))
}

/// Create the parent directories of `path`.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ScaffoldError::path_io(parent, e))?;
    }
    Ok(())
}

/// Remove a file, symlink or directory tree. Missing paths are fine.
pub fn remove_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ScaffoldError::path_io(path, e)),
    };

    debug!(path = %path.display(), "removing");
    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ScaffoldError::path_io(path, e)),
    }
}

/// Copy `src` to `dst` the way `cp -a` does.
///
/// Directories are copied recursively, symlinks are recreated rather than
/// followed, and file permissions carry over. Parent directories of `dst`
/// are created.
pub fn copy_path(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    ensure_parent_dir(dst)?;
    copy_entry(src, dst)
}

fn copy_entry(src: &Path, dst: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(src).map_err(|e| ScaffoldError::path_io(src, e))?;
    let file_type = meta.file_type();

    if file_type.is_symlink() {
        copy_symlink(src, dst)
    } else if file_type.is_dir() {
        fs::create_dir_all(dst).map_err(|e| ScaffoldError::path_io(dst, e))?;
        for entry in fs::read_dir(src).map_err(|e| ScaffoldError::path_io(src, e))? {
            let entry = entry.map_err(|e| ScaffoldError::path_io(src, e))?;
            copy_entry(&entry.path(), &dst.join(entry.file_name()))?;
        }
        fs::set_permissions(dst, meta.permissions()).map_err(|e| ScaffoldError::path_io(dst, e))
    } else {
        fs::copy(src, dst)
            .map(|_| ())
            .map_err(|e| ScaffoldError::path_io(src, e))
    }
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src).map_err(|e| ScaffoldError::path_io(src, e))?;
    std::os::unix::fs::symlink(&target, dst).map_err(|e| ScaffoldError::path_io(dst, e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    // No portable way to recreate the link; copy what it points at.
    if directory_exists(src) {
        fs::create_dir_all(dst).map_err(|e| ScaffoldError::path_io(dst, e))?;
        for entry in fs::read_dir(src).map_err(|e| ScaffoldError::path_io(src, e))? {
            let entry = entry.map_err(|e| ScaffoldError::path_io(src, e))?;
            copy_entry(&entry.path(), &dst.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(src, dst)
            .map(|_| ())
            .map_err(|e| ScaffoldError::path_io(src, e))
    }
}
