//! File existence checks.

use super::Target;
use anyhow::Result;
use console::style;

/// Check that every file exists, or with `absent` that none does.
pub fn run(target: &Target, files: &[String], absent: bool) -> Result<()> {
    let harness = target.open()?;

    if absent {
        harness.check_files_do_not_exist(files)?;
    } else {
        harness.check_files_exist(files)?;
    }

    let verb = if absent { "absent" } else { "present" };
    for f in files {
        println!("  {} {} {}", style("✓").green(), f, style(verb).dim());
    }
    Ok(())
}
