//! Vendoring of monorepo node_modules into the temp project.
//!
//! Freshly installed projects resolve published packages. The harness
//! overwrites the ones under test (and a few of their peers) with the
//! monorepo's own copies so scaffolded workspaces run against local code.

use crate::error::{Result, ScaffoldError};
use crate::files::{copy_path, exists, remove_path};
use crate::harness::Harness;
use tracing::{debug, info};

/// Schematics task executor, relative to the temp project.
pub const SCHEMATICS_EXECUTOR: &str =
    "node_modules/@angular-devkit/schematics/tasks/node-package/executor.js";

/// Executor that emits once and completes, so package install tasks are skipped.
pub const VENDOR_EXECUTOR_STUB: &str = r#"
function default_1() {
  return () => {
    const rxjs = require("rxjs");
    return new rxjs.Observable(obs => {
      obs.next();
      obs.complete();
    });
  };
}
exports.default = default_1;
"#;

/// Executor that completes without emitting. Written into the backup project.
pub const NOOP_EXECUTOR_STUB: &str = r#"
"use strict";
Object.defineProperty(exports, "__esModule", { value: true });
const rxjs_1 = require("rxjs");
function default_1(factoryOptions = {}) {
    return (options) => {
        return new rxjs_1.Observable(obs => {
          obs.complete();
        });
    };
}
exports.default = default_1;
"#;

impl Harness {
    /// Replace `node_modules/<name>` of the temp project with the root copy.
    pub fn copy_node_module(&self, name: &str) -> Result<()> {
        self.vendor_path(&format!("node_modules/{}", name), name)
    }

    /// Vendor every configured module and bin, stub the schematics executor,
    /// and prune paths that break the copied packages.
    pub fn copy_missing_packages(&self) -> Result<()> {
        let vendor = &self.config.vendor;
        info!(modules = vendor.modules.len(), "vendoring node_modules");

        for module in &vendor.modules {
            self.copy_node_module(module)?;
        }

        self.update_file(SCHEMATICS_EXECUTOR, VENDOR_EXECUTOR_STUB)?;

        for bin in &vendor.bins {
            let rel = format!("node_modules/.bin/{}", bin);
            self.vendor_path(&rel, &format!(".bin/{}", bin))?;
        }

        for rel in &vendor.prune_project {
            remove_path(self.tmp_proj_file(rel))?;
        }
        for rel in &vendor.prune_root {
            remove_path(self.paths.root().join(rel))?;
        }
        Ok(())
    }

    fn vendor_path(&self, rel: &str, module: &str) -> Result<()> {
        let src = self.paths.root().join(rel);
        let dst = self.tmp_proj_file(rel);

        remove_path(&dst)?;
        if !exists(&src) {
            return Err(ScaffoldError::VendorSourceMissing {
                module: module.to_string(),
                source_path: src,
            });
        }
        debug!(module, "vendoring");
        copy_path(&src, &dst)
    }
}
