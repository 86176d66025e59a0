//! node_modules vendoring command.

use super::{spinner, Target};
use anyhow::{bail, Result};
use console::style;

/// Copy the configured root node_modules entries into the temp project.
pub fn run(target: &Target) -> Result<()> {
    let harness = target.open()?;
    if !harness.directory_exists(harness.tmp_proj_path()) {
        bail!(
            "No temp project at {}. Run `scaffold prepare` first.",
            harness.tmp_proj_path().display()
        );
    }

    let modules = harness.config().vendor.modules.len();
    let pb = spinner(format!("Vendoring {} modules...", modules))?;
    let result = harness.copy_missing_packages();
    pb.finish_and_clear();

    if let Err(e) = result {
        if let Some(hint) = e.recovery_suggestion() {
            eprintln!("  {} {}", style("→").cyan(), hint);
        }
        return Err(e.into());
    }

    println!("{} Vendored {} modules", style("✓").green(), style(modules).cyan());
    Ok(())
}
