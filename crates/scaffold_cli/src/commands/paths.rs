//! Temp project layout display.

use super::Target;
use anyhow::Result;
use console::style;

/// Print where the harness keeps its projects.
pub fn run(target: &Target) -> Result<()> {
    let harness = target.open()?;
    let paths = harness.paths();

    println!("{}", style(format!("Layout for {}:", target.cli)).bold());
    println!("  Root:             {}", paths.root().display());
    println!("  Temp project:     {}", style(paths.tmp_proj_path().display()).cyan());
    println!("  Backup project:   {}", paths.tmp_backup_proj_path().display());
    println!("  Workspace config: {}", paths.workspace_config_path().display());
    println!(
        "  Backup cached:    {}",
        if harness.directory_exists(paths.tmp_backup_proj_path()) {
            style("yes").green()
        } else {
            style("no").yellow()
        }
    );
    Ok(())
}
