//! Temp project preparation commands.

use super::{spinner, Target};
use anyhow::Result;
use console::style;

/// Recreate the temp project from the backup, scaffolding the backup first if needed.
pub fn run(target: &Target) -> Result<()> {
    let harness = target.open()?;
    let cached = harness.directory_exists(harness.tmp_backup_proj_path());

    let pb = spinner(if cached {
        format!("Restoring {} project from backup...", target.cli)
    } else {
        format!("Scaffolding {} backup project (this takes a while)...", target.cli)
    })?;
    let result = harness.new_project();
    pb.finish_and_clear();
    result?;

    println!(
        "{} Temp project ready at {}",
        style("✓").green(),
        style(harness.tmp_proj_path().display()).cyan()
    );
    if !cached {
        println!(
            "  {} Backup cached at {}",
            style("→").cyan(),
            harness.tmp_backup_proj_path().display()
        );
    }
    Ok(())
}

/// Create the temp project only when it is missing.
pub fn ensure(target: &Target) -> Result<()> {
    let harness = target.open()?;
    if harness.directory_exists(harness.tmp_proj_path()) {
        println!(
            "{} Temp project already exists at {}",
            style("✓").green(),
            harness.tmp_proj_path().display()
        );
        return Ok(());
    }
    run(target)
}
