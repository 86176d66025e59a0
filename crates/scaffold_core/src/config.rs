//! Harness configuration: command templates, scaffold layout, vendoring lists.

use crate::error::{Result, ScaffoldError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up at the harness root.
pub const CONFIG_FILE: &str = "scaffold.toml";

/// Complete harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// External commands the harness shells out to.
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Temp project layout and `new` arguments.
    #[serde(default)]
    pub scaffold: ScaffoldConfig,

    /// node_modules vendoring.
    #[serde(default)]
    pub vendor: VendorConfig,

    /// CI worker limits.
    #[serde(default)]
    pub workers: WorkersConfig,
}

impl Config {
    /// Load configuration from `scaffold.toml` under `root`, or defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| ScaffoldError::ConfigError(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| ScaffoldError::ConfigError(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `scaffold.toml` under `root`.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScaffoldError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| ScaffoldError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// Command prefixes. Generators run from `tmp/<cli>`, everything else from the temp project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommandsConfig {
    /// Prefix for `run_cli` / `run_cli_async`.
    pub cli: String,
    /// Prefix for `run_ng_add`.
    pub ng: String,
    /// Package manager install command.
    pub install: String,
    /// ngcc invocation. Empty disables the step.
    pub ngcc: String,
    /// Generator used by `run_new` for the nx variant.
    pub nx_generator: String,
    /// Generator used by `run_new` for the angular variant.
    pub angular_generator: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            cli: "node ./node_modules/@nrwl/cli/bin/nx.js".to_string(),
            ng: "./node_modules/.bin/ng".to_string(),
            install: "yarn install".to_string(),
            ngcc: "node ./node_modules/@angular/compiler-cli/ngcc/main-ngcc.js".to_string(),
            nx_generator: "node ../../node_modules/@nrwl/tao/index.js".to_string(),
            angular_generator: "../../node_modules/.bin/ng".to_string(),
        }
    }
}

/// Temp project layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Directory under the root holding per-CLI sandboxes.
    pub tmp_dir: String,
    /// Name passed to `new` and used as the temp project directory.
    pub project_name: String,
    /// Extra arguments `new_project` passes to `run_new`.
    pub new_args: String,
    /// Where locally built packages live, relative to the root.
    pub build_packages_dir: String,
    /// Packages linked into devDependencies as `file:` paths.
    pub local_packages: Vec<String>,
    /// Package that is only linked when `add_workspace` is requested.
    pub workspace_package: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            tmp_dir: "tmp".to_string(),
            project_name: "proj".to_string(),
            new_args: "--collection=@nrwl/workspace --npmScope=proj".to_string(),
            build_packages_dir: "build/packages".to_string(),
            local_packages: ["angular", "react", "storybook", "jest"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            workspace_package: "workspace".to_string(),
        }
    }
}

/// Which root node_modules entries are copied into the temp project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VendorConfig {
    /// Module directories copied from the root node_modules.
    pub modules: Vec<String>,
    /// Entries of node_modules/.bin replaced by the root copy.
    pub bins: Vec<String>,
    /// Paths removed from the temp project after copying.
    pub prune_project: Vec<String>,
    /// Paths removed from the root after copying.
    pub prune_root: Vec<String>,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            modules: DEFAULT_VENDORED_MODULES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            bins: vec!["webpack".to_string(), "bazel".to_string()],
            prune_project: vec!["node_modules/cypress/node_modules/@types".to_string()],
            prune_root: vec![
                "node_modules/karma/node_modules/mime".to_string(),
                "node_modules/ng-packagr/node_modules/mime".to_string(),
            ],
        }
    }
}

/// Worker caps applied to generated projects on CI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkersConfig {
    /// Value written to `options.maxWorkers`.
    pub max_workers: u32,
    /// Builders that need the cap.
    pub builder_prefixes: Vec<String>,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            builder_prefixes: vec![
                "@nrwl/node".to_string(),
                "@nrwl/web".to_string(),
                "@nrwl/jest".to_string(),
            ],
        }
    }
}

/// Environment the harness reacts to, captured once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// `SELECTED_CLI`: restricts which CLI variants run.
    pub selected_cli: Option<String>,
    /// `CIRCLECI`: running on CI.
    pub in_ci: bool,
    /// `WINDOWSTMP`: temp dir to hand karma under WSL.
    pub windows_tmp: Option<String>,
}

impl EnvOverrides {
    /// Snapshot the relevant variables from the process environment.
    pub fn from_env() -> Self {
        Self {
            selected_cli: non_empty_var("SELECTED_CLI"),
            in_ci: non_empty_var("CIRCLECI").is_some(),
            windows_tmp: non_empty_var("WINDOWSTMP"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Modules copied from the root node_modules so scaffolded projects never hit the network.
pub const DEFAULT_VENDORED_MODULES: &[&str] = &[
    "@ngrx",
    "@nrwl",
    "angular",
    "@angular",
    "@angular-devkit",
    "codelyzer",
    "ngrx-store-freeze",
    "npm-run-all",
    "yargs",
    "yargs-parser",
    "ng-packagr",
    "cypress",
    "@jest",
    "jest",
    "@types/jest",
    "@types/node",
    "jest-preset-angular",
    "identity-obj-proxy",
    "karma",
    "karma-chrome-launcher",
    "karma-coverage-istanbul-reporter",
    "karma-jasmine",
    "karma-jasmine-html-reporter",
    "jasmine-core",
    "jasmine-spec-reporter",
    "jasmine-marbles",
    "@types/jasmine",
    "@types/jasminewd2",
    "@nestjs",
    "express",
    "@types/express",
    "protractor",
    "react",
    "react-dom",
    "react-router-dom",
    "styled-components",
    "@types/react",
    "@types/react-dom",
    "@types/react-router-dom",
    "@testing-library",
    // webpack config with babel-loader
    "@babel",
    "@svgr/webpack",
    "babel-loader",
    "babel-plugin-const-enum",
    "babel-plugin-macros",
    "eslint-plugin-import",
    "eslint-plugin-jsx-a11y",
    "eslint-plugin-react",
    "eslint-plugin-react-hooks",
    "url-loader",
    // web bundles
    "rollup",
    "@rollup",
    "rollup-plugin-babel",
    "rollup-plugin-filesize",
    "rollup-plugin-local-resolve",
    "rollup-plugin-peer-deps-external",
    "rollup-plugin-postcss",
    "rollup-plugin-typescript2",
    "next",
    "document-register-element",
    "@angular/forms",
    "@storybook",
    "fork-ts-checker-webpack-plugin",
    // web builder with inlined build-angular
    "source-map",
    "webpack-sources",
    "terser",
    "caniuse-lite",
    "browserslist",
    "license-webpack-plugin",
    "webpack-subresource-integrity",
    "autoprefixer",
    "mini-css-extract-plugin",
    "postcss-import",
    "worker-plugin",
    "regenerator-runtime",
    "clean-css",
    "loader-utils",
    "postcss",
    "url",
    "circular-dependency-plugin",
    "terser-webpack-plugin",
    "parse5",
    "cacache",
    "find-cache-dir",
    "tree-kill",
    "speed-measure-webpack-plugin",
    "webpack-merge",
    "semver",
    "css-loader",
    "mime",
    "less",
    "send",
    "@bazel",
];
