use crate::harness::{Assertion, Scenario};
use anyhow::ensure;
use scaffold_core::{CliVariant, NOOP_EXECUTOR_STUB};
use serde_json::json;
use std::fs;

#[test]
fn test_new_project_vendors_local_packages() {
    Scenario::new("new_project_vendors_local_packages")
        .new_project()
        .assert_files_exist(&[
            "package.json",
            "workspace.json",
            "karma.conf.js",
            "node_modules/.yarn-integrity",
            "node_modules/semver/package.json",
            "node_modules/@nrwl/jest/package.json",
        ])
        .assert_file_contains("node_modules/@nrwl/workspace/package.json", "local")
        .assert_file_contains("node_modules/.bin/webpack", "local webpack")
        .assert_files_absent(&["node_modules/cypress/node_modules/@types", "angular.json"])
        .assert(Assertion::RootPathMissing(
            "node_modules/karma/node_modules/mime".to_string(),
        ))
        .assert(Assertion::Custom(Box::new(|h| {
            ensure!(h.paths().root().join("node_modules/karma/package.json").exists());
            Ok(())
        })))
        .assert(Assertion::BackupExists)
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_backup_gets_completing_executor_stub() {
    Scenario::new("backup_executor_stub")
        .new_project()
        .assert_file_contains(
            "node_modules/@angular-devkit/schematics/tasks/node-package/executor.js",
            "obs.complete();",
        )
        .assert_file_not_contains(
            "node_modules/@angular-devkit/schematics/tasks/node-package/executor.js",
            "obs.next();",
        )
        .assert(Assertion::Custom(Box::new(|h| {
            let stub = fs::read_to_string(h.paths().tmp_backup_proj_file(
                "node_modules/@angular-devkit/schematics/tasks/node-package/executor.js",
            ))?;
            ensure!(stub == NOOP_EXECUTOR_STUB, "backup executor is {:?}", stub);
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_package_json_points_at_local_builds() {
    Scenario::new("package_json_local_builds")
        .new_project()
        .assert_json("package.json", "/devDependencies/typescript", json!("~3.9.3"))
        .assert(Assertion::Custom(Box::new(|h| {
            let pkg = h.read_json("package.json")?;
            for name in ["workspace", "angular", "react", "storybook", "jest"] {
                let expected = format!(
                    "file:{}",
                    h.paths().root().join("build/packages").join(name).display()
                );
                let actual = &pkg["devDependencies"][format!("@nrwl/{}", name)];
                ensure!(actual == &json!(expected), "@nrwl/{} is {}", name, actual);
            }
            Ok(())
        })))
        .assert_file_contains("package.json", "\n  \"devDependencies\": {\n")
        .run()
        .unwrap();
}

#[test]
fn test_backup_is_reused() {
    Scenario::new("backup_is_reused")
        .new_project()
        .update_file("apps/scratch.txt", "dirty")
        .new_project()
        .assert_files_absent(&["apps/scratch.txt"])
        .assert_files_exist(&["package.json", "node_modules/semver/package.json"])
        .assert_generator_runs(1)
        .assert(Assertion::InstallRuns(1))
        .run()
        .unwrap();
}

#[test]
fn test_remove_backup_scaffolds_again() {
    Scenario::new("remove_backup_scaffolds_again")
        .new_project()
        .remove_backup()
        .new_project()
        .assert_generator_runs(2)
        .assert(Assertion::BackupExists)
        .run()
        .unwrap();
}

#[test]
fn test_ensure_project() {
    Scenario::new("ensure_project")
        .ensure_project()
        .assert_generator_runs(1)
        .update_file("apps/keep.txt", "keep")
        .ensure_project()
        .assert_files_exist(&["apps/keep.txt"])
        .cleanup()
        .ensure_project()
        .assert_files_absent(&["apps/keep.txt"])
        .assert_files_exist(&["package.json"])
        .assert_generator_runs(1)
        .run()
        .unwrap();
}

#[test]
fn test_angular_variant() {
    Scenario::new("angular_variant")
        .cli(CliVariant::Angular)
        .new_project()
        .assert_files_exist(&["angular.json", "package.json"])
        .assert_files_absent(&["workspace.json"])
        .assert(Assertion::RootFileContains {
            path: "generator.log".to_string(),
            content: "angular new proj --no-interactive --skip-install --collection=@nrwl/workspace --npmScope=proj".to_string(),
        })
        .assert(Assertion::Custom(Box::new(|h| {
            ensure!(h.tmp_proj_path().ends_with("tmp/angular/proj"));
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_ngcc_runs_async_locally() {
    Scenario::new("ngcc_local")
        .new_project()
        .assert(Assertion::Custom(Box::new(|h| {
            let log = fs::read_to_string(h.paths().root().join("ngcc.log"))?;
            ensure!(log.starts_with("ngcc"), "ngcc.log: {:?}", log);
            ensure!(!log.contains("--async=false"), "ngcc.log: {:?}", log);
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_ngcc_runs_sync_on_ci() {
    Scenario::new("ngcc_ci")
        .on_ci()
        .new_project()
        .assert(Assertion::RootFileContains {
            path: "ngcc.log".to_string(),
            content: "ngcc --async=false".to_string(),
        })
        .run()
        .unwrap();
}

#[test]
fn test_run_new_returns_output() {
    Scenario::new("run_new_output")
        .run_new(Some("--npmScope=demo"), false)
        .assert_output_contains("CREATE proj/package.json")
        .assert_output_contains("success Saved lockfile.")
        .assert(Assertion::RootFileContains {
            path: "generator.log".to_string(),
            content: "nx new proj --no-interactive --skip-install --npmScope=demo".to_string(),
        })
        .run_new(None, true)
        .assert_generator_runs(2)
        .run()
        .unwrap();
}
