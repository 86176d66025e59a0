//! E2E test harness for the scaffold library.
//!
//! Scenarios run against a copy of the `monorepo` fixture whose external
//! commands are shell scripts, so the full scaffold flow runs offline.

#![allow(dead_code)]

pub mod scenario;
pub mod workspace;

// Re-export commonly used types
pub use assertions::Assertion;
pub use scenario::Scenario;
