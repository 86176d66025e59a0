//! Small helpers shared by test suites.

use crate::error::Result;
use rand::Rng;
use std::path::PathBuf;

/// `prefix` followed by a random number below 10,000,000, for app and lib names.
pub fn uniq(prefix: &str) -> String {
    let n: u32 = rand::rng().random_range(0..10_000_000);
    format!("{}{}", prefix, n)
}

/// Process working directory; the default harness root.
pub fn get_cwd() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}

/// Whether browser-driven suites run. They never do in this harness.
pub fn support_ui() -> bool {
    false
}
