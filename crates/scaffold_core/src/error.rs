//! Error types for scaffold_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for harness operations.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// I/O error without a more specific path attached.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error while touching a specific path.
    #[error("I/O error at {}: {}", path.display(), source)]
    PathIo {
        /// Path being read, written or removed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The shell could not be started for a command.
    #[error("failed to spawn `{command}`: {source}")]
    CommandSpawn {
        /// The command line
        command: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// A command exited with a non-zero status.
    #[error("command `{command}` failed with {}", describe_status(*status))]
    CommandFailed {
        /// The command line
        command: String,
        /// Exit code, `None` when killed by a signal
        status: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// A JSON file could not be parsed or serialized.
    #[error("invalid JSON in {}: {}", path.display(), reason)]
    Json {
        /// Path of the JSON file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// A built-in output pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(regex::Error),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A CLI variant name was not recognized.
    #[error("unknown CLI variant '{0}' (expected 'nx' or 'angular')")]
    UnknownCli(String),

    /// A file expected by an assertion is missing.
    #[error("File '{}' does not exist", .0.display())]
    FileMissing(PathBuf),

    /// A file expected to be absent is present.
    #[error("File '{}' should not exist", .0.display())]
    UnexpectedFile(PathBuf),

    /// A module listed for vendoring is not installed at the harness root.
    #[error("cannot vendor '{module}': {} not found", source_path.display())]
    VendorSourceMissing {
        /// Module name as listed in the vendor config
        module: String,
        /// Where the module was expected
        source_path: PathBuf,
    },

    /// Test runner output did not report a passing run.
    #[error("tests did not pass: {0}")]
    TestsFailed(String),

    /// The backup lock for a CLI variant could not be taken.
    #[error("backup lock {} could not be acquired: {}", path.display(), source)]
    BackupLocked {
        /// Path of the lock file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

impl ScaffoldError {
    /// Wraps an I/O error with the path it happened on.
    pub fn path_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathIo {
            path: path.into(),
            source,
        }
    }

    /// Captured stdout of a failed command, if this is one.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stdout, .. } => Some(stdout),
            _ => None,
        }
    }

    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::VendorSourceMissing { .. } => {
                Some("Run 'yarn install' at the repository root, or trim [vendor].modules in scaffold.toml.")
            }
            Self::UnknownCli(_) => Some("Set SELECTED_CLI to 'nx' or 'angular'."),
            Self::BackupLocked { .. } => {
                Some("Another test process is scaffolding the backup project. Remove tmp/<cli>/.backup.lock if it is stale.")
            }
            Self::ConfigError(_) => Some("Check scaffold.toml at the repository root."),
            Self::CommandSpawn { .. } => Some("Make sure a POSIX shell is available on PATH."),
            _ => None,
        }
    }
}

/// Convenience Result type for scaffold_core operations.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
