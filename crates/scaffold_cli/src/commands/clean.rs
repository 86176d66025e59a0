//! Temp project cleanup command.

use super::Target;
use anyhow::Result;
use console::style;

/// Remove the temp project, and the backup with `backup`.
pub fn run(target: &Target, backup: bool) -> Result<()> {
    let harness = target.open()?;

    harness.cleanup()?;
    println!(
        "{} Removed {}",
        style("✓").green(),
        harness.tmp_proj_path().display()
    );

    if backup {
        harness.remove_backup()?;
        println!(
            "{} Removed {}",
            style("✓").green(),
            harness.tmp_backup_proj_path().display()
        );
    }
    Ok(())
}
