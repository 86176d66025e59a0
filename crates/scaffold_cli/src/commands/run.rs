//! Command passthrough to the workspace and Angular CLIs.

use super::Target;
use anyhow::Result;
use scaffold_core::RunOpts;

fn opts(silence_error: bool) -> RunOpts {
    if silence_error {
        RunOpts::silenced()
    } else {
        RunOpts::default()
    }
}

/// Run the workspace CLI and print its output.
pub fn cli(target: &Target, args: &[String], silence_error: bool) -> Result<()> {
    let harness = target.open()?;
    let output = harness.run_cli(&args.join(" "), &opts(silence_error))?;
    print!("{}", output);
    Ok(())
}

/// Run the Angular CLI and print its output.
pub fn ng(target: &Target, args: &[String], silence_error: bool) -> Result<()> {
    let harness = target.open()?;
    let output = harness.run_ng_add(&args.join(" "), &opts(silence_error))?;
    print!("{}", output);
    Ok(())
}
