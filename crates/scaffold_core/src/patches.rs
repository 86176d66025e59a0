//! Patches applied to generated project files.

use crate::error::Result;
use crate::harness::Harness;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Line of `karma.conf.js` after which the temp dir override is inserted.
pub const KARMA_REQUIRE_LINE: &str = "const { constants } = require('karma');";

/// Insert a `TMPDIR` override after the karma require line.
///
/// Returns `None` when the line is not present.
pub fn patch_karma_source(source: &str, windows_tmp: &str) -> Option<String> {
    if !source.contains(KARMA_REQUIRE_LINE) {
        return None;
    }
    Some(source.replacen(
        KARMA_REQUIRE_LINE,
        &format!(
            "{}\nprocess.env['TMPDIR']=\"{}\";",
            KARMA_REQUIRE_LINE, windows_tmp
        ),
        1,
    ))
}

/// Set `architect.build.options.maxWorkers` on every project whose build
/// builder starts with one of `builder_prefixes`. Returns how many projects changed.
pub fn apply_max_workers(workspace: &mut Value, builder_prefixes: &[String], max_workers: u32) -> usize {
    let Some(projects) = workspace.get_mut("projects").and_then(Value::as_object_mut) else {
        return 0;
    };

    let mut patched = 0;
    for (name, project) in projects.iter_mut() {
        let Some(build) = project
            .get_mut("architect")
            .and_then(|a| a.get_mut("build"))
            .and_then(Value::as_object_mut)
        else {
            continue;
        };

        let builder = build.get("builder").and_then(Value::as_str).unwrap_or("");
        if !builder_prefixes.iter().any(|p| builder.starts_with(p.as_str())) {
            continue;
        }

        let options = build
            .entry("options")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(options) = options.as_object_mut() {
            options.insert("maxWorkers".to_string(), Value::from(max_workers));
            debug!(project = %name, "capped maxWorkers");
            patched += 1;
        }
    }
    patched
}

/// Point `devDependencies` entries at local `file:` paths.
pub fn apply_local_package_deps(package_json: &mut Value, deps: &[(String, String)]) {
    let Some(root) = package_json.as_object_mut() else {
        return;
    };
    let dev = root
        .entry("devDependencies")
        .or_insert_with(|| Value::Object(Map::new()));
    if !dev.is_object() {
        *dev = Value::Object(Map::new());
    }
    if let Some(dev) = dev.as_object_mut() {
        for (name, version) in deps {
            dev.insert(name.clone(), Value::String(version.clone()));
        }
    }
}

impl Harness {
    /// Make karma use the Windows temp dir when tests run under WSL.
    ///
    /// Only acts when `WINDOWSTMP` is set. Every failure is swallowed.
    pub fn patch_karma_to_work_on_wsl(&self) {
        let Some(windows_tmp) = self.env.windows_tmp.clone() else {
            return;
        };
        let result = self.read_file("karma.conf.js").and_then(|source| {
            match patch_karma_source(&source, &windows_tmp) {
                Some(patched) => self.update_file("karma.conf.js", patched),
                None => Ok(()),
            }
        });
        if let Err(e) = result {
            debug!(error = %e, "skipping karma WSL patch");
        }
    }

    /// Cap jest/node/web build workers on CI so builds don't spawn a worker per core.
    pub fn set_max_workers(&self) -> Result<()> {
        if !self.env.in_ci {
            return Ok(());
        }
        let name = self.workspace_config_name();
        let mut workspace = self.read_json(name)?;
        let workers = &self.config.workers;
        let patched = apply_max_workers(&mut workspace, &workers.builder_prefixes, workers.max_workers);
        info!(patched, file = name, "set maxWorkers");
        self.write_json(name, &workspace)
    }
}
