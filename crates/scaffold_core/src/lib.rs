//! Scaffold Core Library
//!
//! End-to-end test support for a monorepo of workspace plugins, providing:
//! - Scaffolding of throwaway workspaces under `tmp/<cli>/proj`
//! - A cached backup project so only the first scaffold per CLI is slow
//! - Vendoring of the monorepo's node_modules into scaffolded projects
//! - Command wrappers for the workspace CLI, the Angular CLI and the shell
//! - File helpers and existence assertions scoped to the temp project
//!
//! # Quick Start
//!
//! ```
//! use scaffold_core::{CliVariant, Config, Harness};
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let harness = Harness::with_config(tmp.path(), CliVariant::Nx, Config::default());
//!
//! harness.update_file("apps/app1/src/main.ts", "console.log('hi');").unwrap();
//! harness.check_files_exist(&["apps/app1/src/main.ts"]).unwrap();
//! assert_eq!(harness.list_files("apps").unwrap(), vec!["app1"]);
//! ```
//!
//! # CLI Selection
//!
//! Suites are written once and run per CLI variant. `SELECTED_CLI` narrows
//! the set:
//!
//! ```
//! use scaffold_core::{clis_to_run, CliVariant};
//!
//! assert_eq!(clis_to_run(None, None), CliVariant::ALL.to_vec());
//! assert_eq!(clis_to_run(Some(CliVariant::Nx), Some(CliVariant::Angular)), vec![]);
//! ```

mod commands;
mod config;
mod error;
mod exec;
mod files;
mod harness;
mod patches;
mod paths;
mod scaffold;
mod util;
mod variant;
mod vendor;

pub use config::{
    CommandsConfig, Config, EnvOverrides, ScaffoldConfig, VendorConfig, WorkersConfig,
    CONFIG_FILE, DEFAULT_VENDORED_MODULES,
};
pub use error::{Result, ScaffoldError};
pub use exec::{
    capture_shell, capture_shell_async, expect_tests_pass, needs_max_workers, run_shell,
    strip_ansi, CommandOutput, RunOpts,
};
pub use files::{copy_path, directory_exists, exists, file_exists, get_size, remove_path};
pub use harness::Harness;
pub use patches::{apply_local_package_deps, apply_max_workers, patch_karma_source, KARMA_REQUIRE_LINE};
pub use paths::ProjectPaths;
pub use util::{get_cwd, support_ui, uniq};
pub use variant::{clis_to_run, current_cli, for_each_cli, set_current_cli, CliVariant};
pub use vendor::{NOOP_EXECUTOR_STUB, SCHEMATICS_EXECUTOR, VENDOR_EXECUTOR_STUB};
